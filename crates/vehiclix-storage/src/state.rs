use aws_sdk_s3::Client;
use serde::{Serialize, de::DeserializeOwned};

use crate::error::StorageError;
use crate::objects::{self, WriteCondition};

/// A deserialized JSON record plus the ETag it was read at.
pub struct Versioned<T> {
    pub value: T,
    pub etag: String,
}

pub async fn load_record<T: DeserializeOwned>(
    client: &Client,
    bucket: &str,
    key: &str,
) -> Result<Versioned<T>, StorageError> {
    let object = objects::get_object(client, bucket, key).await?;
    Ok(Versioned {
        value: serde_json::from_slice(&object.body)?,
        etag: object.etag,
    })
}

/// Serialize and write `value` under `condition`. Returns the new ETag.
pub async fn save_record<T: Serialize>(
    client: &Client,
    bucket: &str,
    key: &str,
    value: &T,
    condition: WriteCondition<'_>,
) -> Result<String, StorageError> {
    let body = serde_json::to_vec(value)?;
    objects::put_json(client, bucket, key, body, condition).await
}
