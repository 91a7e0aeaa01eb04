// ── Wire encoding ──
//
// Turns a `ProductDraft` into the request body the catalog service
// expects. A draft with an attachment goes out as multipart form data;
// everything else is plain JSON. Identity is written back under the
// field it was read from.

use serde_json::{Map, Value};
use stockroom_api::{FormField, FormValue, ProductBody};

use crate::model::ProductDraft;

pub use crate::model::{require_identity, resolve_identity};

/// Encode `draft` for a create or update request.
pub fn encode_for_wire(draft: &ProductDraft) -> ProductBody {
    if draft.attachment.is_some() {
        ProductBody::Multipart(multipart_fields(draft))
    } else {
        ProductBody::Json(json_fields(draft))
    }
}

/// Form fields in send order: `image, name, price, amount, description,
/// id, _id, imageUrl`. `imageUrl` is only sent when no file is attached
/// and it is non-empty.
fn multipart_fields(draft: &ProductDraft) -> Vec<FormField> {
    let mut fields = Vec::with_capacity(8);

    if let Some(attachment) = &draft.attachment {
        fields.push(FormField {
            name: "image",
            value: FormValue::File {
                file_name: attachment.file_name.clone(),
                content_type: attachment.content_type.clone(),
                bytes: attachment.bytes.clone(),
            },
        });
    }

    fields.push(FormField::text("name", draft.name.as_str()));
    fields.push(FormField::text("price", draft.price.to_string()));
    fields.push(FormField::text("amount", draft.amount.to_string()));
    if let Some(description) = &draft.description {
        fields.push(FormField::text("description", description.as_str()));
    }
    if let Some(id) = &draft.id {
        fields.push(FormField::text(id.source().field(), id.as_str()));
    }
    if draft.attachment.is_none() {
        if let Some(url) = draft.image_url.as_deref().filter(|u| !u.is_empty()) {
            fields.push(FormField::text("imageUrl", url));
        }
    }

    fields
}

/// An empty `imageUrl` is kept: it clears the stored image.
fn json_fields(draft: &ProductDraft) -> Value {
    let mut body = Map::new();
    if let Some(id) = &draft.id {
        body.insert(id.source().field().to_owned(), id.to_json());
    }
    body.insert("name".into(), Value::from(draft.name.as_str()));
    body.insert("price".into(), Value::from(draft.price));
    body.insert("amount".into(), Value::from(draft.amount));
    if let Some(description) = &draft.description {
        body.insert("description".into(), Value::from(description.as_str()));
    }
    if let Some(url) = &draft.image_url {
        body.insert("imageUrl".into(), Value::from(url.as_str()));
    }
    if let Some(active) = draft.is_active {
        body.insert("isActive".into(), Value::from(active));
    }
    Value::Object(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Attachment, IdentitySource, ProductId};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn names(body: &ProductBody) -> Vec<&'static str> {
        match body {
            ProductBody::Multipart(fields) => fields.iter().map(|f| f.name).collect(),
            ProductBody::Json(_) => Vec::new(),
        }
    }

    #[test]
    fn draft_without_attachment_is_json() {
        let draft = ProductDraft::new("Zaku", 590.0, 15)
            .with_id(ProductId::new("2", IdentitySource::Fallback))
            .with_description("green");
        assert_eq!(
            encode_for_wire(&draft),
            ProductBody::Json(json!({
                "id": 2,
                "name": "Zaku",
                "price": 590.0,
                "amount": 15,
                "description": "green"
            }))
        );
    }

    #[test]
    fn attachment_switches_to_multipart_in_field_order() {
        let draft = ProductDraft::new("RX-78", 1290.0, 3)
            .with_id(ProductId::from("a1"))
            .with_description("MG")
            .with_image_url("https://example.com/old.jpg")
            .with_attachment(Attachment::new("rx78.png", b"\x89PNG".to_vec()));

        let body = encode_for_wire(&draft);
        assert_eq!(
            names(&body),
            vec!["image", "name", "price", "amount", "description", "_id"]
        );
    }

    #[test]
    fn multipart_text_values_render_plainly() {
        let draft = ProductDraft::new("Dom", 1500.0, 1)
            .with_attachment(Attachment::new("dom.jpg", b"jpg".to_vec()));
        let ProductBody::Multipart(fields) = encode_for_wire(&draft) else {
            panic!("expected multipart");
        };
        let price = fields.iter().find(|f| f.name == "price").and_then(FormField::as_text);
        assert_eq!(price, Some("1500"));
    }

    #[test]
    fn empty_image_url_is_sent_as_json_but_not_as_form_field() {
        let draft = ProductDraft::new("Gouf", 990.0, 4).with_image_url("");
        let ProductBody::Json(value) = encode_for_wire(&draft) else {
            panic!("expected json");
        };
        assert_eq!(value["imageUrl"], json!(""));

        let with_file = draft.with_attachment(Attachment::new("g.png", Vec::new()));
        assert!(!names(&encode_for_wire(&with_file)).contains(&"imageUrl"));
    }
}
