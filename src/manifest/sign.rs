use std::time::SystemTime;

use aws_credential_types::Credentials;
use aws_sigv4::http_request::{
    PayloadChecksumKind, PercentEncodingMode, SignableBody, SignableRequest, SigningSettings,
    UriPathNormalizationMode, sign,
};
use aws_sigv4::sign::v4;
use aws_smithy_runtime_api::client::identity::Identity;

use crate::error::StorageError;

const SERVICE: &str = "s3";

pub(super) struct SigningKeys<'keys> {
    pub access_key: &'keys str,
    pub secret_key: &'keys str,
    pub region: &'keys str,
}

/// Returns the headers that authorise a `PUT` of `body` to `url`.
///
/// S3 wants the payload hash as a header and the object path signed as sent.
pub(super) fn sign_put(
    url: &str,
    body: &[u8],
    keys: &SigningKeys<'_>,
    at: SystemTime,
) -> Result<Vec<(String, String)>, StorageError> {
    let identity: Identity =
        Credentials::new(keys.access_key, keys.secret_key, None, None, "flowramp").into();
    let mut settings = SigningSettings::default();
    settings.payload_checksum_kind = PayloadChecksumKind::XAmzSha256;
    settings.percent_encoding_mode = PercentEncodingMode::Single;
    settings.uri_path_normalization_mode = UriPathNormalizationMode::Disabled;

    let params = v4::SigningParams::builder()
        .identity(&identity)
        .region(keys.region)
        .name(SERVICE)
        .time(at)
        .settings(settings)
        .build()
        .map_err(|err| StorageError::SigV4Params {
            source: Box::new(err),
        })?
        .into();

    let signable = SignableRequest::new(
        "PUT",
        url,
        std::iter::empty(),
        SignableBody::Bytes(body),
    )
    .map_err(|err| StorageError::SigV4Request {
        source: Box::new(err),
    })?;
    let (instructions, _signature) = sign(signable, &params)
        .map_err(|err| StorageError::SigV4Sign {
            source: Box::new(err),
        })?
        .into_parts();

    let mut request = http::Request::builder()
        .method("PUT")
        .uri(url)
        .body(())
        .map_err(|err| StorageError::SigV4BuildSign {
            source: Box::new(err),
        })?;
    instructions.apply_to_request_http1x(&mut request);

    Ok(request
        .headers()
        .iter()
        .filter_map(|(name, value)| {
            value
                .to_str()
                .ok()
                .map(|value| (name.as_str().to_owned(), value.to_owned()))
        })
        .collect())
}
