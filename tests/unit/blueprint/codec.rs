use super::*;
use crate::blueprint::model::{Blueprint, Entity};
use crate::foundation::core::{EntityId, Position};

#[test]
fn bytes_roundtrip_exactly() {
    let json = br#"{"blueprint":{"icons":[],"entities":[],"wires":[],"item":"blueprint","version":1}}"#;
    let text = encode_bytes(json).unwrap();
    assert!(text.starts_with('0'));
    assert_eq!(decode_bytes(&text).unwrap(), json.to_vec());
}

#[test]
fn trailing_newline_is_ignored() {
    let text = encode_bytes(b"{}").unwrap();
    assert_eq!(decode_bytes(&format!("{text}\n")).unwrap(), b"{}".to_vec());
}

#[test]
fn document_roundtrip() {
    let mut bp = Blueprint::empty();
    bp.entities.push(Entity::lamp(EntityId(1), Position::new(0.0, 0.0)));
    let doc = BlueprintDocument { blueprint: bp };
    let back = decode(&encode(&doc).unwrap()).unwrap();
    assert_eq!(back, doc);
}

#[test]
fn malformed_input_is_a_codec_error() {
    for bad in ["", "1eNq", "0!!!not-base64", "0aGVsbG8="] {
        assert!(
            matches!(decode_bytes(bad), Err(LampreelError::Codec(_))),
            "{bad:?} should fail as a codec error"
        );
    }
}

#[test]
fn non_blueprint_json_is_a_serde_error() {
    let text = encode_bytes(br#"{"not":"a blueprint"}"#).unwrap();
    assert!(matches!(decode(&text), Err(LampreelError::Serde(_))));
    assert!(decode_value(&text).is_ok());
}
