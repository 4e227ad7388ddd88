//! Wire codec: a message is one JSON array, kind first.
//!
//! ```text
//! [10, "TAM3054", -23.51, -46.62, 350]
//!  ^kind ^payload scalars in order
//! ```

use serde::ser::{Serialize, SerializeSeq, Serializer};

use crate::{CodecError, Message, MessageKind, Scalar};

struct Frame<'a>(&'a Message);

impl Serialize for Frame<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(1 + self.0.payload.len()))?;
        seq.serialize_element(&self.0.kind.0)?;
        for scalar in &self.0.payload {
            seq.serialize_element(scalar)?;
        }
        seq.end()
    }
}

pub fn encode(message: &Message) -> Result<Vec<u8>, CodecError> {
    Ok(serde_json::to_vec(&Frame(message))?)
}

pub fn decode(frame: &[u8]) -> Result<Message, CodecError> {
    let mut scalars: Vec<Scalar> = serde_json::from_slice(frame)?;
    if scalars.is_empty() {
        return Err(CodecError::Empty);
    }
    let kind = match scalars.remove(0) {
        Scalar::Int(k) => i32::try_from(k).map_err(|_| CodecError::BadKind(k.to_string()))?,
        other => return Err(CodecError::BadKind(format!("{other:?}"))),
    };
    Ok(Message::new(MessageKind(kind), scalars))
}
