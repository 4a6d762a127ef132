// src/classify/fence.rs
//! Removal of the Markdown code fence models like to wrap JSON in.

const FENCE: &str = "```";

/// Strip a leading ```` ``` ```` (plus optional language tag such as `json`) and a
/// trailing ```` ``` ````, but only when they sit at the very start / end of the
/// trimmed reply. Repeats until nothing changes, so the function is idempotent.
/// Un-fenced input only loses surrounding whitespace.
pub fn strip_fence(reply: &str) -> &str {
    let mut s = reply.trim();
    loop {
        let before = s.len();

        if let Some(rest) = s.strip_prefix(FENCE) {
            // language tag: ```json / ```JSON / ``` json
            s = rest
                .trim_start_matches([' ', '\t'])
                .trim_start_matches(|c: char| c.is_ascii_alphanumeric());
        }
        if let Some(rest) = s.strip_suffix(FENCE) {
            s = rest;
        }
        s = s.trim();

        if s.len() == before {
            return s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn strips_json_fence() {
        let r = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_fence(r), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence_and_whitespace() {
        let r = "  \n```\n{\"a\": 1}\n```  \n";
        assert_eq!(strip_fence(r), "{\"a\": 1}");
    }

    #[test]
    fn unfenced_json_is_untouched() {
        let r = "{\"resumo\": \"uso de ```json em texto\", \"x\": [1,2]}";
        assert_eq!(strip_fence(r), r);
    }

    #[test]
    fn only_one_side_fenced() {
        assert_eq!(strip_fence("```json {\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_fence("{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn tag_after_a_space_is_stripped() {
        assert_eq!(strip_fence("``` json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_fence("```\tJSON\n{}\n```"), "{}");
    }

    #[test]
    fn nested_fences_reach_fixpoint() {
        let r = "```json\n```json\n{}\n```\n```";
        assert_eq!(strip_fence(r), "{}");
    }

    #[test]
    fn empty_and_fence_only() {
        assert_eq!(strip_fence(""), "");
        assert_eq!(strip_fence("```"), "");
        assert_eq!(strip_fence("```json\n```"), "");
    }

    #[test]
    fn idempotent_on_random_inputs() {
        // Seeded so failures reproduce.
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let atoms = ["```", "json", "\n", " ", "\t", "{", "}", "\"k\"", ":", "1", "`", "JSON", "x"];
        for _ in 0..2_000 {
            let n = rng.random_range(0..12);
            let s: String = (0..n)
                .map(|_| atoms[rng.random_range(0..atoms.len())])
                .collect();
            let once = strip_fence(&s);
            assert_eq!(strip_fence(once), once, "input: {s:?}");
        }
    }
}
