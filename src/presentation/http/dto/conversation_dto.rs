use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::application::use_cases::ask_question::AskQuestionResponse;
use crate::domain::entities::ConversationTurn;

#[derive(Debug, Deserialize)]
pub struct AskRequestDto {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub document_id: DocumentIdField,
}

/// The `document_id` of an ask request as the client sent it.
///
/// Falsy JSON (`null`, `0`, `""`, `false`, empty array or object) selects no
/// document. Integers and integer strings select that id. Anything else can
/// never name a document.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum DocumentIdField {
    #[default]
    Absent,
    Id(i32),
    Invalid(String),
}

impl DocumentIdField {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Null | Value::Bool(false) => Self::Absent,
            Value::Number(number) => match number.as_i64() {
                Some(0) => Self::Absent,
                Some(id) => i32::try_from(id)
                    .map(Self::Id)
                    .unwrap_or_else(|_| Self::Invalid(number.to_string())),
                None => match number.as_f64() {
                    Some(f) if f == 0.0 => Self::Absent,
                    Some(f) if f.fract() == 0.0 && f.abs() <= i32::MAX as f64 => {
                        Self::Id(f as i32)
                    }
                    _ => Self::Invalid(number.to_string()),
                },
            },
            Value::String(raw) if raw.is_empty() => Self::Absent,
            Value::String(raw) => match raw.trim().parse::<i32>() {
                Ok(id) => Self::Id(id),
                Err(_) => Self::Invalid(raw),
            },
            Value::Array(items) if items.is_empty() => Self::Absent,
            Value::Object(fields) if fields.is_empty() => Self::Absent,
            other => Self::Invalid(other.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for DocumentIdField {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_json)
    }
}

#[derive(Debug, Serialize)]
pub struct AskResponseDto {
    pub answer: String,
    pub sources: Vec<String>,
}

impl From<AskQuestionResponse> for AskResponseDto {
    fn from(response: AskQuestionResponse) -> Self {
        Self {
            answer: response.answer,
            sources: response.sources,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationTurnDto {
    pub id: i32,
    pub document_id: Option<i32>,
    pub user_message: String,
    pub ai_response: String,
    pub is_summary: bool,
    pub tokens_used: Option<i32>,
    pub created_at: String,
}

impl From<ConversationTurn> for ConversationTurnDto {
    fn from(turn: ConversationTurn) -> Self {
        Self {
            id: turn.id(),
            document_id: turn.document_id(),
            user_message: turn.user_message().to_string(),
            ai_response: turn.ai_response().to_string(),
            is_summary: turn.is_summary(),
            tokens_used: turn.tokens_used(),
            created_at: turn.created_at().to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationListResponseDto {
    pub turns: Vec<ConversationTurnDto>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document_id_of(body: Value) -> DocumentIdField {
        serde_json::from_value::<AskRequestDto>(body).unwrap().document_id
    }

    #[test]
    fn test_falsy_document_id_selects_nothing() {
        assert_eq!(document_id_of(json!({"question": "hi"})), DocumentIdField::Absent);
        let falsy_values = [
            json!(null),
            json!(0),
            json!(0.0),
            json!(""),
            json!(false),
            json!([]),
            json!({}),
        ];
        for falsy in falsy_values {
            assert_eq!(
                document_id_of(json!({"question": "hi", "document_id": falsy})),
                DocumentIdField::Absent,
                "{} should select no document",
                falsy
            );
        }
    }

    #[test]
    fn test_numeric_document_ids() {
        assert_eq!(document_id_of(json!({"document_id": 5})), DocumentIdField::Id(5));
        assert_eq!(document_id_of(json!({"document_id": "5"})), DocumentIdField::Id(5));
        assert_eq!(document_id_of(json!({"document_id": " 7 "})), DocumentIdField::Id(7));
        assert_eq!(document_id_of(json!({"document_id": 3.0})), DocumentIdField::Id(3));
        assert_eq!(document_id_of(json!({"document_id": -2})), DocumentIdField::Id(-2));
        assert_eq!(document_id_of(json!({"document_id": "0"})), DocumentIdField::Id(0));
    }

    #[test]
    fn test_unusable_document_ids() {
        let unusable = [
            json!("abc"),
            json!(2.5),
            json!(true),
            json!([1]),
            json!(10_000_000_000i64),
        ];
        for bad in unusable {
            assert!(
                matches!(
                    document_id_of(json!({"document_id": bad})),
                    DocumentIdField::Invalid(_)
                ),
                "{} should be unusable",
                bad
            );
        }
    }
}
