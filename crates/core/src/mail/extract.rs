//! Pure functions that reshape Gmail message resources into the minimal
//! JSON contract served to the frontend.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};

use super::types::{GmailMessage, MailDetail, MailSummary, MessageHeader, MessagePart};

/// Subject shown when a message carries no `Subject` header.
pub const NO_SUBJECT: &str = "(sans sujet)";

/// Upper bound on rows returned by a recent-mail listing.
pub const MAX_RECENT_MAIL: usize = 5;

/// Headers requested for the metadata-only list fetch.
pub const SUMMARY_HEADERS: [&str; 2] = ["Subject", "Date"];

const TEXT_PLAIN: &str = "text/plain";

/// Base64url engine that tolerates both padded and unpadded input.
const LENIENT_URL_SAFE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Case-insensitive header lookup.
pub fn header_value<'a>(headers: &'a [MessageHeader], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

fn payload_headers(message: &GmailMessage) -> &[MessageHeader] {
    message
        .payload
        .as_ref()
        .map(|p| p.headers.as_slice())
        .unwrap_or(&[])
}

/// Build a list row from a metadata-format message.
///
/// A missing `Subject` becomes [`NO_SUBJECT`], a missing `Date` becomes `""`.
pub fn summarize(message: &GmailMessage) -> MailSummary {
    let headers = payload_headers(message);

    MailSummary {
        id: message.id.clone(),
        subject: header_value(headers, "Subject")
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_SUBJECT)
            .to_string(),
        date: header_value(headers, "Date").unwrap_or_default().to_string(),
    }
}

/// Build the detail view from a full-format message.
///
/// The detail `subject` is the message snippet. The `Subject` header only
/// fills in for an empty snippet.
pub fn detail(message: &GmailMessage) -> MailDetail {
    let subject = message
        .snippet
        .as_deref()
        .filter(|s| !s.is_empty())
        .or(header_value(payload_headers(message), "Subject").filter(|s| !s.is_empty()))
        .unwrap_or(NO_SUBJECT)
        .to_string();

    let body = message
        .payload
        .as_ref()
        .and_then(extract_plain_text)
        .map(|data| decode_body_data(&data))
        .unwrap_or_default();

    MailDetail {
        id: message.id.clone(),
        subject,
        body,
    }
}

/// Find the encoded plain-text body of a payload.
///
/// Multipart payloads yield the first `text/plain` part (nested multiparts
/// are searched depth-first). Single-part payloads yield their own body.
/// Returns `None` when nothing usable exists, e.g. HTML-only multiparts.
pub fn extract_plain_text(payload: &MessagePart) -> Option<String> {
    match payload.parts.as_deref() {
        Some(parts) if !parts.is_empty() => parts.iter().find_map(find_text_part),
        _ => body_data(payload),
    }
}

fn find_text_part(part: &MessagePart) -> Option<String> {
    if part.mime_type.as_deref() == Some(TEXT_PLAIN) {
        if let Some(data) = body_data(part) {
            return Some(data);
        }
    }

    part.parts
        .as_deref()
        .and_then(|parts| parts.iter().find_map(find_text_part))
}

fn body_data(part: &MessagePart) -> Option<String> {
    part.body
        .as_ref()
        .and_then(|b| b.data.as_deref())
        .filter(|d| !d.is_empty())
        .map(String::from)
}

/// Decode Gmail body data to text.
///
/// Accepts the URL-safe and the standard alphabet, with or without padding.
/// Invalid UTF-8 sequences are replaced; undecodable input yields `""`.
pub fn decode_body_data(data: &str) -> String {
    let normalized: String = data
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    match LENIENT_URL_SAFE.decode(normalized.as_bytes()) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to decode message body");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mail::MessagePartBody;

    fn header(name: &str, value: &str) -> MessageHeader {
        MessageHeader {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    fn part(mime: &str, data: Option<&str>) -> MessagePart {
        MessagePart {
            mime_type: Some(mime.to_string()),
            body: Some(MessagePartBody {
                data: data.map(String::from),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    fn message(headers: Vec<MessageHeader>, payload: MessagePart) -> GmailMessage {
        GmailMessage {
            id: "m1".to_string(),
            payload: Some(MessagePart { headers, ..payload }),
            ..Default::default()
        }
    }

    #[test]
    fn summarize_reads_subject_and_date() {
        let msg = message(
            vec![
                header("Subject", "Hello"),
                header("Date", "Mon, 1 Jan 2024 10:00:00"),
            ],
            MessagePart::default(),
        );

        let summary = summarize(&msg);

        assert_eq!(summary.id, "m1");
        assert_eq!(summary.subject, "Hello");
        assert_eq!(summary.date, "Mon, 1 Jan 2024 10:00:00");
    }

    #[test]
    fn summarize_uses_placeholder_without_subject() {
        let msg = message(vec![header("Date", "Tue, 2 Jan 2024")], MessagePart::default());

        let summary = summarize(&msg);

        assert_eq!(summary.subject, NO_SUBJECT);
        assert_eq!(summary.date, "Tue, 2 Jan 2024");
    }

    #[test]
    fn summarize_without_payload_degrades_to_defaults() {
        let msg = GmailMessage {
            id: "bare".to_string(),
            ..Default::default()
        };

        let summary = summarize(&msg);

        assert_eq!(summary.subject, NO_SUBJECT);
        assert_eq!(summary.date, "");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let headers = vec![header("subject", "lower")];
        assert_eq!(header_value(&headers, "Subject"), Some("lower"));
        assert_eq!(header_value(&headers, "Date"), None);
    }

    #[test]
    fn detail_picks_first_plain_text_part() {
        let payload = MessagePart {
            mime_type: Some("multipart/alternative".to_string()),
            parts: Some(vec![
                part("text/html", Some("PGI-aGk8L2I-")),
                part("text/plain", Some("aGVsbG8=")),
                part("text/plain", Some("c2Vjb25k")),
            ]),
            ..Default::default()
        };
        let msg = message(vec![header("Subject", "Greeting")], payload);

        let detail = detail(&msg);

        assert_eq!(detail.subject, "Greeting");
        assert_eq!(detail.body, "hello");
    }

    #[test]
    fn detail_searches_nested_multiparts() {
        let payload = MessagePart {
            mime_type: Some("multipart/mixed".to_string()),
            parts: Some(vec![
                MessagePart {
                    mime_type: Some("multipart/alternative".to_string()),
                    parts: Some(vec![part("text/plain", Some("bmVzdGVk"))]),
                    ..Default::default()
                },
                part("application/pdf", None),
            ]),
            ..Default::default()
        };

        assert_eq!(detail(&message(vec![], payload)).body, "nested");
    }

    #[test]
    fn detail_falls_back_to_top_level_body() {
        let msg = message(vec![], part("text/plain", Some("dG9wIGxldmVs")));
        assert_eq!(detail(&msg).body, "top level");
    }

    #[test]
    fn detail_html_only_multipart_has_empty_body() {
        let payload = MessagePart {
            mime_type: Some("multipart/alternative".to_string()),
            parts: Some(vec![part("text/html", Some("PHA-aGk8L3A-"))]),
            ..Default::default()
        };

        assert_eq!(detail(&message(vec![], payload)).body, "");
    }

    #[test]
    fn detail_subject_is_the_snippet() {
        let mut msg = message(vec![header("Subject", "Header subject")], MessagePart::default());
        msg.snippet = Some("Snippet text".to_string());

        assert_eq!(detail(&msg).subject, "Snippet text");
    }

    #[test]
    fn detail_subject_without_snippet_falls_back() {
        let mut msg = message(vec![header("Subject", "Header subject")], MessagePart::default());
        msg.snippet = Some(String::new());
        assert_eq!(detail(&msg).subject, "Header subject");

        let msg = message(vec![], MessagePart::default());
        assert_eq!(detail(&msg).subject, NO_SUBJECT);
    }

    #[test]
    fn decode_accepts_both_alphabets_and_padding() {
        assert_eq!(decode_body_data("aGVsbG8="), "hello");
        assert_eq!(decode_body_data("aGVsbG8"), "hello");
        // "??>" encodes to "Pz8-" (url-safe) and "Pz8+" (standard)
        assert_eq!(decode_body_data("Pz8-"), "??>");
        assert_eq!(decode_body_data("Pz8+"), "??>");
    }

    #[test]
    fn decode_ignores_line_breaks() {
        assert_eq!(decode_body_data("aGVs\r\nbG8="), "hello");
    }

    #[test]
    fn decode_handles_utf8_and_garbage() {
        // "héllo" in UTF-8
        assert_eq!(decode_body_data("aMOpbGxv"), "héllo");
        assert_eq!(decode_body_data("!!!not base64!!!"), "");
    }
}
