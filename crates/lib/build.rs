const PROTOS: &[&str] = &[
    "proto/ondewo/nlu/user.proto",
    "proto/ondewo/nlu/intent.proto",
    "proto/ondewo/nlu/session.proto",
];

/// Proto3 string fields left out of the `sourceData` rendering when empty.
const OMIT_EMPTY: &[&str] = &[
    ".ondewo.nlu.QueryResult.query_text",
    ".ondewo.nlu.QueryResult.fulfillment_text",
    ".ondewo.nlu.QueryResult.language_code",
    ".ondewo.nlu.Intent.name",
    ".ondewo.nlu.Intent.display_name",
    ".ondewo.nlu.Intent.Message.Image.image_uri",
    ".ondewo.nlu.Intent.Message.Image.accessibility_text",
    ".ondewo.nlu.Intent.Message.QuickReplies.title",
    ".ondewo.nlu.Intent.Message.Card.title",
    ".ondewo.nlu.Intent.Message.Card.subtitle",
    ".ondewo.nlu.Intent.Message.Card.image_uri",
    ".ondewo.nlu.Intent.Message.Card.Button.text",
    ".ondewo.nlu.Intent.Message.Card.Button.postback",
    ".ondewo.nlu.Intent.Message.Video.uri",
    ".ondewo.nlu.Intent.Message.Video.accessibility_text",
    ".ondewo.nlu.Intent.Message.Audio.uri",
    ".ondewo.nlu.Intent.Message.Audio.accessibility_text",
];

/// `Intent.Message` oneof members, rendered under their proto field names.
const MESSAGE_KINDS: &[&str] = &["text", "image", "quick_replies", "card", "video", "audio"];

fn main() {
    for proto in PROTOS {
        println!("cargo:rerun-if-changed={proto}");
    }
    // Dotted paths also match everything nested below them; the undotted oneof paths match
    // only the exact field or variant.
    let mut config = tonic_build::configure()
        .build_server(true)
        .type_attribute(".ondewo.nlu.QueryResult", "#[derive(serde::Serialize)]")
        .type_attribute(".ondewo.nlu.Intent", "#[derive(serde::Serialize)]")
        .field_attribute("Intent.Message.message", "#[serde(flatten)]");
    for kind in MESSAGE_KINDS {
        config = config.field_attribute(
            format!("Intent.Message.message.{kind}"),
            format!("#[serde(rename = \"{kind}\")]"),
        );
    }
    for field in OMIT_EMPTY {
        config = config.field_attribute(field, "#[serde(skip_serializing_if = \"String::is_empty\")]");
    }
    config
        .compile_protos(PROTOS, &["proto"])
        .expect("ondewo nlu proto compilation must succeed");
}
