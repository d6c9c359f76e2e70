//! Optional research survey

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::{Date, OffsetDateTime};

use crate::{AnonymousId, Error, Platform, Result};

/// Whether the donor wants to answer the survey
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyChoice {
    Yes,
    No,
    AlreadyAnswered,
}

impl FromStr for SurveyChoice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" => Ok(SurveyChoice::Yes),
            "no" => Ok(SurveyChoice::No),
            "already-answered" | "already_answered" => Ok(SurveyChoice::AlreadyAnswered),
            other => Err(Error::InvalidInput(format!("unknown survey choice: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementAnswer {
    pub from: Option<Date>,
    pub until: Option<Date>,
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtestAnswer {
    pub first: Option<Date>,
    pub last: Option<Date>,
    pub reason: Option<String>,
}

/// Survey answers as stored next to the donated data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Survey {
    pub anonymous_id: AnonymousId,
    pub platform: Platform,
    /// "Have you ever been active in a social movement?"
    pub active_movement: bool,
    /// Details, only kept when `active_movement` is true
    pub movement: Option<MovementAnswer>,
    /// "Have you ever participated in a protest?"
    pub participated_protest: bool,
    /// Details, only kept when `participated_protest` is true
    pub protest: Option<ProtestAnswer>,
    pub remembered_post: Option<String>,
    #[serde(with = "time::serde::timestamp")]
    pub submitted_at: OffsetDateTime,
}

impl Survey {
    pub fn new(anonymous_id: AnonymousId, platform: Platform) -> Self {
        Self {
            anonymous_id,
            platform,
            active_movement: false,
            movement: None,
            participated_protest: false,
            protest: None,
            remembered_post: None,
            submitted_at: OffsetDateTime::now_utc(),
        }
    }

    /// Answer "yes" to the movement question; empty details are not stored
    pub fn with_movement(mut self, movement: MovementAnswer) -> Self {
        self.active_movement = true;
        self.movement = (movement != MovementAnswer::default()).then_some(movement);
        self
    }

    /// Answer "yes" to the protest question; empty details are not stored
    pub fn with_protest(mut self, protest: ProtestAnswer) -> Self {
        self.participated_protest = true;
        self.protest = (protest != ProtestAnswer::default()).then_some(protest);
        self
    }

    pub fn with_remembered_post(mut self, post: impl Into<String>) -> Self {
        let post = post.into();
        if !post.trim().is_empty() {
            self.remembered_post = Some(post);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_survey_serialization() {
        let id: AnonymousId = "0123abcd".parse().unwrap();
        let survey = Survey::new(id, Platform::Instagram)
            .with_protest(ProtestAnswer {
                first: Some(date!(2019 - 09 - 20)),
                last: None,
                reason: Some("climate".to_string()),
            })
            .with_remembered_post("   ");

        let value = serde_json::to_value(&survey).unwrap();
        assert_eq!(value["anonymous_id"], "0123abcd");
        assert_eq!(value["platform"], "Instagram");
        assert_eq!(value["active_movement"], false);
        assert!(value["movement"].is_null());
        assert_eq!(value["participated_protest"], true);
        assert_eq!(value["protest"]["reason"], "climate");
        assert!(value["remembered_post"].is_null());
    }

    #[test]
    fn test_yes_without_details() {
        let id: AnonymousId = "0123abcd".parse().unwrap();
        let survey = Survey::new(id.clone(), Platform::Twitter)
            .with_movement(MovementAnswer::default())
            .with_protest(ProtestAnswer::default());

        assert!(survey.active_movement);
        assert!(survey.participated_protest);
        assert!(survey.movement.is_none());
        assert!(survey.protest.is_none());

        let unanswered = Survey::new(id, Platform::Twitter);
        assert!(!unanswered.active_movement);
        assert!(!unanswered.participated_protest);
    }

    #[test]
    fn test_survey_choice_parse() {
        assert_eq!("Yes".parse::<SurveyChoice>().unwrap(), SurveyChoice::Yes);
        assert_eq!(
            "already-answered".parse::<SurveyChoice>().unwrap(),
            SurveyChoice::AlreadyAnswered
        );
        assert!("maybe".parse::<SurveyChoice>().is_err());
    }
}
