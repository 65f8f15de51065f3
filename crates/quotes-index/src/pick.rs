use quotes_model::QuoteIndex;
use rand::seq::{index, SliceRandom};
use rand::Rng;
use thiserror::Error;

/// Lines shorter than this (in characters, after trimming) are dropped.
const MIN_LINE_CHARS: usize = 2;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PickError {
    #[error("expected FILE=COUNT, got '{0}'")]
    InvalidTake(String),
}

/// Which files to draw quotes from, and how many from each.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickPlan {
    /// `(file name, count)` pairs drawn in order.
    pub sources: Vec<(String, usize)>,
    /// Lines drawn from one randomly chosen file that is not a source.
    pub others: usize,
}

impl Default for PickPlan {
    fn default() -> Self {
        Self {
            sources: vec![("en.txt".to_string(), 6), ("hi.txt".to_string(), 8)],
            others: 1,
        }
    }
}

impl PickPlan {
    /// Parse a `FILE=COUNT` source, e.g. `en.txt=6`.
    pub fn parse_take(take: &str) -> Result<(String, usize), PickError> {
        let invalid = || PickError::InvalidTake(take.to_string());
        let (file, count) = take.split_once('=').ok_or_else(invalid)?;
        let file = file.trim();
        if file.is_empty() {
            return Err(invalid());
        }
        let count = count.trim().parse().map_err(|_| invalid())?;
        Ok((file.to_string(), count))
    }

    fn is_source(&self, file: &str) -> bool {
        self.sources.iter().any(|(name, _)| name == file)
    }
}

/// Split file text into usable lines: trimmed, blank and one-character
/// lines removed. Handles both `\n` and `\r\n` endings.
pub fn sanitize_lines(text: &str) -> Vec<&str> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() >= MIN_LINE_CHARS)
        .collect()
}

/// Pick up to `count` distinct lines in random order.
pub fn pick_unique<'a, R: Rng + ?Sized>(
    lines: &[&'a str],
    count: usize,
    rng: &mut R,
) -> Vec<&'a str> {
    let amount = count.min(lines.len());
    index::sample(rng, lines.len(), amount)
        .into_iter()
        .map(|i| lines[i])
        .collect()
}

fn lines_for<'a>(index: &'a QuoteIndex, file: &str) -> Vec<&'a str> {
    index.get(file).map(|text| sanitize_lines(text)).unwrap_or_default()
}

/// Build one block of text from random quotes, ending with `thought`.
///
/// Pieces are concatenated without any separator. Files named in the plan
/// but absent from the index contribute nothing.
pub fn compose_block<R: Rng + ?Sized>(
    index: &QuoteIndex,
    plan: &PickPlan,
    thought: &str,
    rng: &mut R,
) -> String {
    let mut picked: Vec<&str> = Vec::new();

    for (file, count) in &plan.sources {
        let lines = lines_for(index, file);
        picked.extend(pick_unique(&lines, *count, rng));
    }

    if plan.others > 0 {
        let others: Vec<&String> = index.keys().filter(|file| !plan.is_source(file)).collect();
        if let Some(file) = others.choose(rng) {
            let lines = lines_for(index, file);
            tracing::debug!(file = %file, lines = lines.len(), "Drawing from extra file");
            picked.extend(pick_unique(&lines, plan.others, rng));
        }
    }

    picked.push(thought.trim());
    picked.concat()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn tokens(prefix: char, n: usize) -> String {
        (0..n).map(|i| format!("[{prefix}{i:02}]\n")).collect()
    }

    fn sample_index() -> QuoteIndex {
        let mut index = QuoteIndex::new();
        index.insert("en.txt".into(), tokens('e', 10));
        index.insert("hi.txt".into(), tokens('h', 12));
        index.insert("fr.txt".into(), tokens('f', 3));
        index
    }

    #[test]
    fn test_sanitize_lines() {
        let text = "  a \r\nhello\r\n\n  x \n  world  \n";
        assert_eq!(sanitize_lines(text), vec!["hello", "world"]);
        assert!(sanitize_lines("").is_empty());
        assert_eq!(sanitize_lines("é!\n"), vec!["é!"]);
    }

    #[test]
    fn test_pick_unique_is_distinct_and_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let lines = vec!["a1", "b2", "c3", "d4", "e5"];

        let picked = pick_unique(&lines, 3, &mut rng);
        assert_eq!(picked.len(), 3);
        let mut sorted = picked.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 3);
        assert!(picked.iter().all(|p| lines.contains(p)));

        let all = pick_unique(&lines, 50, &mut rng);
        assert_eq!(all.len(), lines.len());

        assert!(pick_unique(&lines, 0, &mut rng).is_empty());
        assert!(pick_unique(&[], 4, &mut rng).is_empty());
    }

    #[test]
    fn test_compose_block_follows_plan() {
        let index = sample_index();
        let mut rng = StdRng::seed_from_u64(42);

        let block = compose_block(&index, &PickPlan::default(), "  my thought ", &mut rng);

        assert!(block.ends_with("]my thought"));
        assert_eq!(block.matches("[e").count(), 6);
        assert_eq!(block.matches("[h").count(), 8);
        assert_eq!(block.matches("[f").count(), 1);
        for i in 0..12 {
            assert!(block.matches(&format!("[h{i:02}]")).count() <= 1);
        }
        assert!(!block.contains('\n'));
    }

    #[test]
    fn test_compose_block_with_missing_sources() {
        let mut index = QuoteIndex::new();
        index.insert("fr.txt".into(), "bonjour\n".into());
        let mut rng = StdRng::seed_from_u64(1);

        let block = compose_block(&index, &PickPlan::default(), "", &mut rng);
        assert_eq!(block, "bonjour");
    }

    #[test]
    fn test_compose_block_without_other_files() {
        let mut index = QuoteIndex::new();
        index.insert("en.txt".into(), "only one\n".into());
        let plan = PickPlan {
            sources: vec![("en.txt".into(), 3)],
            others: 2,
        };
        let mut rng = StdRng::seed_from_u64(3);

        assert_eq!(compose_block(&index, &plan, "!", &mut rng), "only one!");
    }

    #[test]
    fn test_parse_take() {
        assert_eq!(PickPlan::parse_take("en.txt=6").unwrap(), ("en.txt".to_string(), 6));
        assert_eq!(PickPlan::parse_take(" hi.txt = 8 ").unwrap(), ("hi.txt".to_string(), 8));
        assert!(PickPlan::parse_take("en.txt").is_err());
        assert!(PickPlan::parse_take("=3").is_err());
        assert_eq!(
            PickPlan::parse_take("en.txt=many"),
            Err(PickError::InvalidTake("en.txt=many".to_string()))
        );
    }
}
