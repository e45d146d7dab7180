//! Table-driven response parser cases
//!
//! Each case feeds one raw completion through the default parser and names
//! the field path the rejection must point at.

use rstest::rstest;

use crate::core::persona_gen::{
    DemographicField, DemographicSeed, ParseError, ResponseParser, ResponseSchema,
};

const BASE: &str = r#""handle":"x","displayName":"y","bio":"z""#;

fn payload(interests: &str) -> String {
    format!(r#"{{{BASE},"interests":{interests}}}"#)
}

#[rstest]
#[case::level_too_high(r#"[{"interest":"Chess","interestLevel":1.5}]"#, "interests[0].interestLevel")]
#[case::level_too_low(r#"[{"interest":"Chess","interestLevel":-1.01}]"#, "interests[0].interestLevel")]
#[case::level_as_string(r#"[{"interest":"Chess","interestLevel":"0.5"}]"#, "interests[0].interestLevel")]
#[case::level_missing(r#"[{"interest":"Chess"}]"#, "interests[0].interestLevel")]
#[case::second_entry_bad(
    r#"[{"interest":"Chess","interestLevel":0.1},{"interest":"Go","interestLevel":2}]"#,
    "interests[1].interestLevel"
)]
#[case::topic_empty(r#"[{"interest":"","interestLevel":0.1}]"#, "interests[0].interest")]
#[case::topic_number(r#"[{"interest":7,"interestLevel":0.1}]"#, "interests[0].interest")]
#[case::entry_not_object(r#"["Chess"]"#, "interests[0]")]
#[case::empty_list("[]", "interests")]
#[case::not_a_list(r#"{"interest":"Chess","interestLevel":0.1}"#, "interests")]
fn test_interest_violations(#[case] interests: &str, #[case] field: &str) {
    let err = ResponseParser::default().parse(&payload(interests)).unwrap_err();
    assert_eq!(err.field(), Some(field), "got {err}");
}

#[rstest]
#[case::handle_missing(r#"{"displayName":"y","bio":"z","interests":[]}"#, "handle")]
#[case::handle_blank(r#"{"handle":"  ","displayName":"y","bio":"z","interests":[]}"#, "handle")]
#[case::display_name_number(r#"{"handle":"x","displayName":3,"bio":"z","interests":[]}"#, "displayName")]
#[case::bio_null(r#"{"handle":"x","displayName":"y","bio":null,"interests":[]}"#, "bio")]
fn test_text_field_violations(#[case] raw: &str, #[case] field: &str) {
    let err = ResponseParser::default().parse(raw).unwrap_err();
    assert_eq!(err.field(), Some(field), "got {err}");
}

#[rstest]
#[case::prose("Sure! Here is a persona for you.")]
#[case::array("[1, 2, 3]")]
#[case::truncated(r#"{"handle":"x","displayName":"#)]
#[case::empty("")]
fn test_malformed_payloads(#[case] raw: &str) {
    let err = ResponseParser::default().parse(raw).unwrap_err();
    assert!(matches!(err, ParseError::MalformedPayload(_)), "got {err}");
}

#[rstest]
#[case::bare(payload(r#"[{"interest":"Chess","interestLevel":0.8}]"#))]
#[case::fenced(format!("```json\n{}\n```", payload(r#"[{"interest":"Chess","interestLevel":0.8}]"#)))]
#[case::fenced_untagged(format!("```\n{}\n```", payload(r#"[{"interest":"Chess","interestLevel":0.8}]"#)))]
#[case::with_preamble(format!(
    "Here you go:\n```json\n{}\n```\nLet me know!",
    payload(r#"[{"interest":"Chess","interestLevel":0.8}]"#)
))]
#[case::backticks_in_bio(format!(
    r#"{{"handle":"x","displayName":"y","bio":"I write ``` code blocks","interests":{}}}"#,
    r#"[{"interest":"Chess","interestLevel":0.8}]"#
))]
#[case::backticks_in_fenced_bio(format!(
    "```json\n{{\"handle\":\"x\",\"displayName\":\"y\",\"bio\":\"```rust```\",\"interests\":{}}}\n```",
    r#"[{"interest":"Chess","interestLevel":0.8}]"#
))]
#[case::boundary_levels(payload(
    r#"[{"interest":"Chess","interestLevel":0.8},{"interest":"A","interestLevel":1},{"interest":"B","interestLevel":-1}]"#
))]
fn test_accepted_payloads(#[case] raw: String) {
    let fields = ResponseParser::default().parse(&raw).unwrap();
    assert_eq!(fields.handle, "x");
    assert_eq!(fields.interests[0].topic, "Chess");
    assert_eq!(fields.interests[0].affinity, 0.8);
}

#[rstest]
#[case::city_requested(DemographicSeed::new().with_city(DemographicField::Generate), "city")]
#[case::gender_pinned(
    DemographicSeed::new().with_gender(DemographicField::Fixed("female".into())),
    "gender"
)]
fn test_requested_demographics_required(#[case] seed: DemographicSeed, #[case] field: &str) {
    let parser = ResponseParser::new(ResponseSchema::for_seed(Some(&seed)));
    let raw = payload(r#"[{"interest":"Chess","interestLevel":0.8}]"#);
    assert_eq!(parser.parse(&raw).unwrap_err().field(), Some(field));
}
