//! [`KeyVaultBackend`] over the MongoDB driver's client-side encryption API.

use async_trait::async_trait;
use common::protocol::MasterKeyDescriptor;
use common::ProvisionError;
use mongodb::{
    bson::{doc, Document},
    client_encryption::{ClientEncryption, MasterKey},
    mongocrypt::ctx::KmsProvider,
    Client, Namespace,
};
use tracing::debug;

use super::{KeyVaultBackend, KeyVaultNamespace, KeyVaultSession};
use crate::aws::AwsCredentials;
use crate::secrets::ConnectionSecret;

/// Connects with [`mongodb::Client`] and verifies the connection with `ping`.
#[derive(Clone, Debug, Default)]
pub struct MongoKeyVault;

#[async_trait]
impl KeyVaultBackend for MongoKeyVault {
    async fn connect(
        &self,
        secret: &ConnectionSecret,
    ) -> Result<Box<dyn KeyVaultSession>, ProvisionError> {
        let client = Client::with_uri_str(secret.uri())
            .await
            .map_err(|e| ProvisionError::Connection(format!("invalid connection string: {e}")))?;

        // The driver connects lazily; force a round trip so an unreachable
        // server fails here and not inside key creation.
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| ProvisionError::Connection(format!("database unreachable: {e}")))?;

        debug!("database connection established");
        Ok(Box::new(MongoSession { client }))
    }
}

/// One verified connection.
#[derive(Clone, Debug)]
pub struct MongoSession {
    client: Client,
}

#[async_trait]
impl KeyVaultSession for MongoSession {
    async fn create_data_key(
        &self,
        namespace: &KeyVaultNamespace,
        credentials: &AwsCredentials,
        master_key: &MasterKeyDescriptor,
        alt_names: &[String],
    ) -> Result<Vec<u8>, ProvisionError> {
        let encryption = ClientEncryption::new(
            self.client.clone(),
            Namespace::new(namespace.db, namespace.coll),
            [(KmsProvider::Aws, kms_provider_doc(credentials), None)],
        )
        .map_err(|e| {
            ProvisionError::KeyCreation(format!("failed to build key-management client: {e}"))
        })?;

        let key_id = encryption
            .create_data_key(aws_master_key(master_key))
            .key_alt_names(alt_names.to_vec())
            .await
            .map_err(|e| ProvisionError::KeyCreation(format!("failed to create data key: {e}")))?;

        Ok(key_id.bytes)
    }
}

/// KMS provider document for the `aws` provider.
fn kms_provider_doc(credentials: &AwsCredentials) -> Document {
    let mut d = doc! {
        "accessKeyId": credentials.access_key_id.as_str(),
        "secretAccessKey": credentials.secret_access_key.as_str(),
    };
    if let Some(token) = &credentials.session_token {
        d.insert("sessionToken", token.as_str());
    }
    d
}

fn aws_master_key(master_key: &MasterKeyDescriptor) -> MasterKey {
    MasterKey::Aws {
        region: master_key.region.clone(),
        key: master_key.key.clone(),
        endpoint: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(session_token: Option<&str>) -> AwsCredentials {
        AwsCredentials {
            access_key_id: "AKIDEXAMPLE".into(),
            secret_access_key: "wJalrXUtnFEMI".into(),
            session_token: session_token.map(str::to_owned),
        }
    }

    #[test]
    fn provider_doc_with_session_token() {
        let d = kms_provider_doc(&creds(Some("tok")));
        assert_eq!(d.get_str("accessKeyId").unwrap(), "AKIDEXAMPLE");
        assert_eq!(d.get_str("secretAccessKey").unwrap(), "wJalrXUtnFEMI");
        assert_eq!(d.get_str("sessionToken").unwrap(), "tok");
    }

    #[test]
    fn provider_doc_omits_absent_session_token() {
        let d = kms_provider_doc(&creds(None));
        assert!(!d.contains_key("sessionToken"));
        assert_eq!(d.len(), 2);
    }

    #[test]
    fn master_key_maps_arn_and_region() {
        let mk = aws_master_key(&MasterKeyDescriptor {
            key: "arn:aws:kms:ap-south-1:111122223333:key/abc".into(),
            region: "ap-south-1".into(),
        });
        match mk {
            MasterKey::Aws {
                region,
                key,
                endpoint,
            } => {
                assert_eq!(region, "ap-south-1");
                assert_eq!(key, "arn:aws:kms:ap-south-1:111122223333:key/abc");
                assert!(endpoint.is_none());
            }
            other => panic!("expected AWS master key, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_uri_is_connection_error() {
        let err = MongoKeyVault
            .connect(&ConnectionSecret::new("not-a-mongodb-uri"))
            .await
            .err()
            .expect("connect should fail");
        assert!(matches!(err, ProvisionError::Connection(_)));
    }
}
