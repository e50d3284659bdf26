//! Bidirectional conversion between the UI message list and the stored
//! content list.
//!
//! The open session holds messages newest-first; storage is oldest-first.
//! Both directions therefore reverse order, so an even number of
//! applications restores the original order.
//!
//! Both functions are pure: no I/O, no hidden state, same input gives the
//! same output (message ids and timestamps aside).

use chrono::Utc;

use crate::models::{Author, Content, InlineData, Message, Part};

/// Convert the newest-first UI message list into the oldest-first stored
/// content list.
///
/// Each message becomes exactly one single-part content: the text field
/// when non-empty text is present, else the inline-data field when an
/// attachment is present. Output length equals input length.
pub fn messages_to_contents(messages: &[Message]) -> Vec<Content> {
    messages
        .iter()
        .rev()
        .map(|message| {
            let part = if !message.text.is_empty() {
                Part::text(message.text.clone())
            } else if let Some(data) = &message.attachment {
                Part::inline_data(data.clone())
            } else {
                Part::text("")
            };
            Content {
                role: message.author.role(),
                parts: vec![part],
            }
        })
        .collect()
}

/// Rebuild the newest-first UI message list from the oldest-first stored
/// content list.
///
/// Only the first part of each content is consulted. Inline data is
/// surfaced both as a display `data:` URI and as the raw attachment, so a
/// later re-transcode writes back the identical payload. Identifiers are
/// positional within the rebuilt list.
pub fn contents_to_messages(contents: &[Content]) -> Vec<Message> {
    contents
        .iter()
        .rev()
        .enumerate()
        .map(|(index, content)| {
            let attachment = content.first_inline_data().cloned();
            let image = attachment.as_ref().map(InlineData::data_uri);
            Message {
                id: index.to_string(),
                text: content.first_text().unwrap_or_default().to_string(),
                created_at: Utc::now(),
                author: Author::from(content.role),
                attachment,
                image,
                failed: false,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn reverses_order_and_maps_roles() {
        // Newest-first: the reply sits at index 0.
        let messages = vec![Message::assistant("hello"), Message::user("hi")];
        let contents = messages_to_contents(&messages);

        assert_eq!(contents.len(), 2);
        assert_eq!(contents[0].role, Role::User);
        assert_eq!(contents[0].first_text(), Some("hi"));
        assert_eq!(contents[1].role, Role::Model);
        assert_eq!(contents[1].first_text(), Some("hello"));
    }

    #[test]
    fn rebuild_reverses_back() {
        let contents = vec![
            Content::text(Role::User, "first prompt"),
            Content::text(Role::Model, "first reply"),
        ];
        let messages = contents_to_messages(&contents);

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].text, "first reply");
        assert_eq!(messages[0].author, Author::Assistant);
        assert_eq!(messages[1].text, "first prompt");
        assert_eq!(messages[1].author, Author::User);
    }

    #[test]
    fn positional_ids_follow_the_rebuilt_order() {
        let contents = vec![
            Content::text(Role::User, "a"),
            Content::text(Role::Model, "b"),
            Content::text(Role::User, "c"),
        ];
        let ids: Vec<String> = contents_to_messages(&contents)
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(ids, ["0", "1", "2"]);
    }

    #[test]
    fn round_trip_preserves_text_and_authors() {
        let messages = vec![
            Message::assistant("reply two"),
            Message::user("prompt two"),
            Message::assistant("reply one"),
            Message::user("prompt one"),
        ];
        let rebuilt = contents_to_messages(&messages_to_contents(&messages));

        assert_eq!(rebuilt.len(), messages.len());
        for (rebuilt, original) in rebuilt.iter().zip(&messages) {
            assert_eq!(rebuilt.text, original.text);
            assert_eq!(rebuilt.author, original.author);
        }
    }

    #[test]
    fn round_trip_preserves_attachment_bytes() {
        let payload = InlineData::new("image/jpeg", "c29tZSBieXRlcw==");
        let messages = vec![Message::user_attachment(payload.clone())];

        let rebuilt = contents_to_messages(&messages_to_contents(&messages));
        assert_eq!(rebuilt[0].attachment.as_ref(), Some(&payload));
        assert_eq!(rebuilt[0].image.as_deref(), Some(payload.data_uri().as_str()));
    }

    #[test]
    fn double_round_trip_restores_content_order() {
        let contents = vec![
            Content::text(Role::User, "one"),
            Content::text(Role::Model, "two"),
            Content::text(Role::User, "three"),
        ];
        let again = messages_to_contents(&contents_to_messages(&contents));
        assert_eq!(again, contents);
    }

    #[test]
    fn text_takes_precedence_over_attachment() {
        let mut message = Message::user("caption");
        message.attachment = Some(InlineData::new("image/png", "QUJD"));

        let contents = messages_to_contents(&[message]);
        assert_eq!(contents[0].first_text(), Some("caption"));
        assert!(contents[0].first_inline_data().is_none());
    }

    #[test]
    fn empty_message_becomes_empty_text_part() {
        let mut message = Message::user("");
        message.attachment = None;

        let contents = messages_to_contents(&[message]);
        assert_eq!(contents[0].first_text(), Some(""));
    }

    #[test]
    fn content_with_empty_first_part_yields_blank_message() {
        let contents = vec![Content {
            role: Role::Model,
            parts: vec![Part::Empty {}],
        }];
        let messages = contents_to_messages(&contents);
        assert_eq!(messages[0].text, "");
        assert!(messages[0].image.is_none());
        assert!(messages[0].attachment.is_none());
    }

    #[test]
    fn content_with_no_parts_yields_blank_message() {
        let contents = vec![Content {
            role: Role::User,
            parts: Vec::new(),
        }];
        let messages = contents_to_messages(&contents);
        assert_eq!(messages[0].text, "");
    }
}
