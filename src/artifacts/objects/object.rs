use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Result;
use bytes::Bytes;
use sha1::{Digest, Sha1};
use std::io::BufRead;
use std::path::PathBuf;

pub trait Packable {
    fn serialize(&self) -> Result<Bytes>;
}

pub trait Unpackable {
    fn deserialize(reader: impl BufRead) -> Result<Self>
    where
        Self: Sized;
}

pub trait Object: Packable {
    fn object_type(&self) -> ObjectType;

    /// Content address of the object
    ///
    /// Defaults to the SHA-1 of the serialized record. Types whose identity must
    /// not depend on incidental serialization order override this.
    fn object_id(&self) -> Result<ObjectId> {
        let content = self.serialize()?;
        digest_to_object_id(Sha1::new_with_prefix(&content))
    }

    fn object_path(&self) -> Result<PathBuf> {
        Ok(self.object_id()?.to_path())
    }
}

pub(crate) fn digest_to_object_id(hasher: Sha1) -> Result<ObjectId> {
    let oid = hasher.finalize();
    ObjectId::try_parse(format!("{oid:x}"))
}

/// Frame a body with the `<type> <size>\0` header shared by every stored object
pub(crate) fn frame(object_type: ObjectType, body: &[u8]) -> Bytes {
    let header = format!("{} {}\0", object_type.as_str(), body.len());

    let mut object_bytes = Vec::with_capacity(header.len() + body.len());
    object_bytes.extend_from_slice(header.as_bytes());
    object_bytes.extend_from_slice(body);

    Bytes::from(object_bytes)
}
