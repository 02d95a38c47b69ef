use serde::{ Serialize, Deserialize };
use serde_json::Value;

use super::chat::ChatMessage;

pub const THINKING_STATUS: &str = "Thinking...";

/// Inbound frame: `{text, sender, timestamp?, chartOption?}`.
#[derive(Deserialize, Debug, Clone)]
pub struct ClientMessage {
    pub text: String,
    pub sender: String,
    #[serde(default)]
    pub timestamp: Option<i64>,
    #[serde(default, rename = "chartOption")]
    pub chart_option: Option<Value>,
}

impl ClientMessage {
    /// Splits the frame into the message to store and the chart it refers to.
    /// A chart that is null, false, zero or empty counts as no chart at all.
    pub fn into_parts(self) -> (ChatMessage, Option<Value>) {
        let chart = self.chart_option.filter(is_truthy);
        (ChatMessage::new(self.text, self.sender, self.timestamp), chart)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum ServerMessage {
    #[serde(rename = "message")] Message {
        sender: String,
        text: String,
        timestamp: Option<i64>,
    },
    #[serde(rename = "status")] Status {
        status: Option<String>,
    },
}

impl ServerMessage {
    pub fn thinking() -> Self {
        ServerMessage::Status { status: Some(THINKING_STATUS.to_string()) }
    }

    pub fn idle() -> Self {
        ServerMessage::Status { status: None }
    }
}

impl From<&ChatMessage> for ServerMessage {
    fn from(message: &ChatMessage) -> Self {
        ServerMessage::Message {
            sender: message.sender.clone(),
            text: message.text.clone(),
            timestamp: message.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_frame_without_timestamp_or_chart() {
        let frame: ClientMessage = serde_json
            ::from_str(r#"{"text":"hello","sender":"alice"}"#)
            .unwrap();
        let (message, chart) = frame.into_parts();
        assert_eq!(message.text, "hello");
        assert_eq!(message.timestamp, None);
        assert!(chart.is_none());
    }

    #[test]
    fn frame_missing_sender_is_rejected() {
        assert!(serde_json::from_str::<ClientMessage>(r#"{"text":"hello"}"#).is_err());
        assert!(serde_json::from_str::<ClientMessage>("not json").is_err());
    }

    #[test]
    fn empty_or_null_chart_option_is_dropped() {
        for chart in [json!(null), json!({}), json!([]), json!(""), json!(false), json!(0)] {
            let frame: ClientMessage = serde_json
                ::from_value(json!({ "text": "t", "sender": "s", "chartOption": chart }))
                .unwrap();
            assert!(frame.into_parts().1.is_none(), "{} should be dropped", chart);
        }
    }

    #[test]
    fn populated_chart_option_is_kept() {
        let frame: ClientMessage = serde_json
            ::from_value(
                json!({ "text": "t", "sender": "s", "timestamp": 5, "chartOption": { "xAxis": {} } })
            )
            .unwrap();
        let (message, chart) = frame.into_parts();
        assert_eq!(message.timestamp, Some(5));
        assert_eq!(chart, Some(json!({ "xAxis": {} })));
    }

    #[test]
    fn outbound_shapes_match_wire_contract() {
        let msg = ServerMessage::from(&ChatMessage::new("hi", "alice", None));
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "type": "message", "sender": "alice", "text": "hi", "timestamp": null })
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::thinking()).unwrap(),
            json!({ "type": "status", "status": "Thinking..." })
        );
        assert_eq!(
            serde_json::to_value(ServerMessage::idle()).unwrap(),
            json!({ "type": "status", "status": null })
        );
    }
}
