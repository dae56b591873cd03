use lullaby_core::{Interest, ParentSettings, Persona, StoryArc, StoryValue};
use std::str::FromStr;

#[test]
fn persona_names_are_snake_case() {
    assert_eq!(Persona::AdventurousExplorer.to_string(), "adventurous_explorer");
    assert_eq!(
        Persona::from_str("curious_learner").unwrap(),
        Persona::CuriousLearner
    );
    assert!(Persona::from_str("pirate_captain").is_err());
}

#[test]
fn values_and_interests_parse() {
    assert_eq!(StoryValue::from_str("perseverance").unwrap(), StoryValue::Perseverance);
    assert_eq!(Interest::from_str("dinosaurs").unwrap(), Interest::Dinosaurs);
    assert_eq!(StoryArc::from_str("simple_adventure").unwrap(), StoryArc::SimpleAdventure);
}

#[test]
fn settings_decode_with_defaults_for_missing_fields() {
    let settings: ParentSettings =
        serde_json::from_str(r#"{"persona":"gentle_friend","child_name":"Mia"}"#).unwrap();
    assert_eq!(settings.persona, Persona::GentleFriend);
    assert_eq!(settings.child_name.as_deref(), Some("Mia"));
    assert!(settings.values.is_empty());
    assert!(settings.custom_elements.is_none());
}
