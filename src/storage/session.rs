//! Credential parsing and client construction

use aws_config::Region;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Builder as S3ConfigBuilder;
use sha2::{Digest, Sha256};

use super::client::R2Client;

/// Fields of the pasted credential string
/// `account_id:bucket:access_key_id:api_token`.
///
/// Splitting is deliberately lenient: absent segments stay empty and an
/// unusable credential only surfaces when the first remote call fails.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Credential {
    pub account_id: String,
    pub bucket: String,
    pub access_key_id: String,
    pub api_token: String,
}

impl Credential {
    pub fn parse(raw: &str) -> Self {
        let mut parts = raw.splitn(4, ':');
        let mut next = || parts.next().unwrap_or("").trim().to_string();
        Credential {
            account_id: next(),
            bucket: next(),
            access_key_id: next(),
            api_token: next(),
        }
    }

    /// S3 secret key for an API token: the SHA-256 hex digest of the token value.
    pub fn secret_access_key(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.api_token.as_bytes());
        hex::encode(hasher.finalize())
    }
}

/// Build a client for the account endpoint. Construction never fails;
/// the vendor checks credential validity on first use.
pub fn create_client(credential: &Credential) -> R2Client {
    let credentials = Credentials::new(
        &credential.access_key_id,
        credential.secret_access_key(),
        None,
        None,
        "drift-provider",
    );

    let endpoint_url = format!(
        "https://{}.r2.cloudflarestorage.com",
        credential.account_id
    );

    let s3_config = S3ConfigBuilder::new()
        .credentials_provider(credentials)
        .region(Region::new("auto"))
        .endpoint_url(endpoint_url)
        .force_path_style(true)
        .build();

    R2Client {
        s3: aws_sdk_s3::Client::from_conf(s3_config),
        http: reqwest::Client::new(),
        bucket: credential.bucket.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::Credential;

    #[test]
    fn parse_splits_all_four_segments() {
        let credential = Credential::parse("acct:media:key-id:tok-value");
        assert_eq!(credential.account_id, "acct");
        assert_eq!(credential.bucket, "media");
        assert_eq!(credential.access_key_id, "key-id");
        assert_eq!(credential.api_token, "tok-value");
    }

    #[test]
    fn parse_accepts_arbitrary_input_without_validation() {
        let credential = Credential::parse("abc123");
        assert_eq!(credential.account_id, "abc123");
        assert_eq!(credential.bucket, "");
        assert_eq!(credential.access_key_id, "");
        assert_eq!(credential.api_token, "");

        assert_eq!(Credential::parse(""), Credential::default());
    }

    #[test]
    fn parse_trims_whitespace_around_segments() {
        let credential = Credential::parse(" acct : media : key : tok ");
        assert_eq!(credential.account_id, "acct");
        assert_eq!(credential.api_token, "tok");
    }

    #[test]
    fn secret_key_is_sha256_of_token_value() {
        let credential = Credential::parse("acct:media:key:abc");
        assert_eq!(
            credential.secret_access_key(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
