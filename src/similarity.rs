use std::collections::HashSet;
use std::hash::Hash;

/// Jaccard similarity `|a ∩ b| / |a ∪ b|`.
///
/// Two empty sets score 0: text with no extractable shingles never counts
/// as a match.
pub fn jaccard<T: Eq + Hash>(a: &HashSet<T>, b: &HashSet<T>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let inter = small.iter().filter(|x| large.contains(*x)).count();
    let union = a.len() + b.len() - inter;
    inter as f64 / union as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shingles::fingerprint;

    fn set(xs: &[&str]) -> HashSet<String> {
        xs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_jaccard_basic() {
        let a = set(&["abc", "bcd", "cde"]);
        let b = set(&["bcd", "cde", "def"]);
        assert!((jaccard(&a, &b) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_edges() {
        let empty: HashSet<String> = HashSet::new();
        let a = set(&["abc"]);
        assert_eq!(jaccard(&empty, &empty), 0.0);
        assert_eq!(jaccard(&a, &empty), 0.0);
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&a, &set(&["xyz"])), 0.0);
    }

    #[test]
    fn test_jaccard_symmetric_and_bounded() {
        let titles = [
            "Apple launches iPhone 16",
            "iPhone 16 launch",
            "Climate report warns of rising seas",
            "",
        ];
        for x in titles {
            for y in titles {
                let (fx, fy) = (fingerprint(x), fingerprint(y));
                let s = jaccard(&fx, &fy);
                assert!((0.0..=1.0).contains(&s));
                assert_eq!(s, jaccard(&fy, &fx));
            }
        }
    }

    #[test]
    fn test_related_titles_clear_operational_threshold() {
        let a = fingerprint("iPhone 16 launch");
        let b = fingerprint("Apple launches iPhone 16");
        let c = fingerprint("Climate report warns of rising seas");
        assert!(jaccard(&a, &b) >= 0.18, "{}", jaccard(&a, &b));
        assert!(jaccard(&a, &c) < 0.18);
        assert!(jaccard(&b, &c) < 0.18);
    }
}
