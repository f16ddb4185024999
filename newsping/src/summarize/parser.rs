//! Line-oriented parser for summarization replies.
//!
//! Model output is not a guaranteed machine format. Each line is matched
//! independently against the known markers; a missing or malformed section
//! degrades to an empty field instead of failing the whole parse.

use std::collections::HashMap;

use super::SummaryResult;

const SUMMARY_LABEL: &str = "요약:";
const KEYWORDS_LABEL: &str = "키워드:";
const EXPLANATION_MARKER: &str = "- ";

/// Parses one free-form reply into a `SummaryResult`.
///
/// Lines are processed top to bottom; the latest match of each kind wins.
/// This never fails: unknown lines are ignored and malformed explanation
/// entries are skipped without touching earlier entries.
pub fn parse_reply(text: &str) -> SummaryResult {
    let mut summary = String::new();
    let mut keywords: Vec<String> = Vec::new();
    let mut explanations: HashMap<String, String> = HashMap::new();

    for line in text.lines() {
        if let Some(rest) = line.strip_prefix(SUMMARY_LABEL) {
            summary = rest.trim().to_string();
        } else if let Some(rest) = line.strip_prefix(KEYWORDS_LABEL) {
            keywords = parse_keyword_list(rest);
        } else if let Some(rest) = line.strip_prefix(EXPLANATION_MARKER) {
            // "- 키워드: 설명" — only the first colon separates key from body
            if let Some((key, explanation)) = rest.split_once(':') {
                let key = key.trim();
                if !key.is_empty() {
                    explanations.insert(key.to_string(), explanation.trim().to_string());
                }
            }
        }
    }

    SummaryResult {
        summary,
        keywords,
        explanations,
    }
}

/// Splits a "키워드:" remainder into trimmed tokens, dropping one surrounding
/// bracket pair if present. An empty remainder yields no keywords at all.
fn parse_keyword_list(rest: &str) -> Vec<String> {
    let rest = rest.trim();
    let rest = rest.strip_prefix('[').unwrap_or(rest);
    let rest = rest.strip_suffix(']').unwrap_or(rest);

    if rest.trim().is_empty() {
        return Vec::new();
    }

    rest.split(',').map(|k| k.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_reply() {
        let reply = "\
요약: 전세 사기 피해가 반복되고 있다.
키워드: [전세보증금, 피해, 대책]
- 전세보증금: 임대인이 보관하는 금액
- 피해: 돌려받지 못하는 상황
";
        let result = parse_reply(reply);

        assert_eq!(result.summary, "전세 사기 피해가 반복되고 있다.");
        assert_eq!(result.keywords, vec!["전세보증금", "피해", "대책"]);
        assert_eq!(result.explanations.len(), 2);
        assert_eq!(
            result.explanations.get("전세보증금").map(String::as_str),
            Some("임대인이 보관하는 금액")
        );
        assert_eq!(
            result.explanations.get("피해").map(String::as_str),
            Some("돌려받지 못하는 상황")
        );
        assert!(!result.explanations.contains_key("대책"));
    }

    #[test]
    fn parsing_is_idempotent() {
        let reply = "요약: 요약문\n키워드: [a, b]\n- a: 설명";
        assert_eq!(parse_reply(reply), parse_reply(reply));
    }

    #[test]
    fn missing_summary_label_yields_empty_summary() {
        let result = parse_reply("키워드: [금리]\n- 금리: 이자율");
        assert!(result.summary.is_empty());
        assert_eq!(result.keywords, vec!["금리"]);
    }

    #[test]
    fn last_keywords_line_wins() {
        let reply = "키워드: [하나, 둘]\n요약: 요약문\n키워드: [셋]";
        let result = parse_reply(reply);
        assert_eq!(result.keywords, vec!["셋"]);
    }

    #[test]
    fn empty_keyword_remainder_yields_empty_list() {
        assert!(parse_reply("키워드:").keywords.is_empty());
        assert!(parse_reply("키워드: ").keywords.is_empty());
        assert!(parse_reply("키워드: []").keywords.is_empty());
    }

    #[test]
    fn keywords_survive_without_brackets() {
        let result = parse_reply("키워드: 하나, 둘 , 셋");
        assert_eq!(result.keywords, vec!["하나", "둘", "셋"]);
    }

    #[test]
    fn duplicate_keywords_are_kept_in_order() {
        let result = parse_reply("키워드: [금리, 환율, 금리]");
        assert_eq!(result.keywords, vec!["금리", "환율", "금리"]);
    }

    #[test]
    fn explanation_splits_on_first_colon_only() {
        let result = parse_reply("- 환율: 정의: 외국 돈과의 교환 비율");
        assert_eq!(
            result.explanations.get("환율").map(String::as_str),
            Some("정의: 외국 돈과의 교환 비율")
        );
    }

    #[test]
    fn malformed_explanation_lines_are_skipped() {
        let reply = "\
- 콜론이 없는 줄
- : 키워드가 빈 줄
- 환율: 교환 비율
";
        let result = parse_reply(reply);
        assert_eq!(result.explanations.len(), 1);
        assert_eq!(
            result.explanations.get("환율").map(String::as_str),
            Some("교환 비율")
        );
    }

    #[test]
    fn malformed_entry_does_not_overwrite_prior_entry() {
        let reply = "- 환율: 교환 비율\n- 환율 콜론 없음";
        let result = parse_reply(reply);
        assert_eq!(
            result.explanations.get("환율").map(String::as_str),
            Some("교환 비율")
        );
    }

    #[test]
    fn explanation_keys_are_trimmed_for_lookup() {
        let result = parse_reply("키워드: [금리]\n-  금리 : 이자율");
        assert_eq!(
            result.explanations.get("금리").map(String::as_str),
            Some("이자율")
        );
    }

    #[test]
    fn explanations_outside_keywords_are_tolerated() {
        // keys in explanations should be a subset of keywords, but a stray
        // entry is informational, never an error
        let result = parse_reply("키워드: [금리]\n- 환율: 교환 비율");
        assert_eq!(result.keywords, vec!["금리"]);
        assert!(result.explanations.contains_key("환율"));
    }

    #[test]
    fn unknown_lines_are_ignored() {
        let reply = "\
안내 문구입니다.
요약: 요약문
중간의 잡담
키워드: [금리]
끝맺음 문구
";
        let result = parse_reply(reply);
        assert_eq!(result.summary, "요약문");
        assert_eq!(result.keywords, vec!["금리"]);
    }
}
