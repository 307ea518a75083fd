//! AWS Signature Version 4 signing for S3-compatible object stores.
//!
//! Two request shapes are produced from the same canonical-request
//! algorithm:
//!
//! - [`RequestSigner::presign`] -- a presigned URL with the signing material
//!   in the query string and an `UNSIGNED-PAYLOAD` body hash. Used for
//!   browser uploads (PUT) and server-side deletes.
//! - [`RequestSigner::sign_copy`] -- an `Authorization`-header request for
//!   server-side COPY, which must sign the `x-amz-copy-source` header.
//!
//! Signing is a pure function of its inputs; the timestamp is always passed
//! in by the caller.

use std::collections::BTreeMap;
use std::fmt;

use crate::hashing::{hmac_sha256, sha256_hex};
use crate::types::Timestamp;

pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const SERVICE: &str = "s3";
pub const UNSIGNED_PAYLOAD: &str = "UNSIGNED-PAYLOAD";

/// Lifetime of a presigned URL in seconds.
pub const PRESIGN_EXPIRES_SECS: u32 = 300;

const TERMINATOR: &str = "aws4_request";

/// Static access-key credentials.
#[derive(Clone)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// A presigned URL plus the intermediate values it was derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedUrl {
    pub url: String,
    pub canonical_request: String,
    pub signature: String,
}

/// A request signed via the `Authorization` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub method: String,
    pub url: String,
    /// Headers to send, including `authorization`. `host` is omitted since
    /// HTTP clients derive it from the URL.
    pub headers: Vec<(String, String)>,
    pub canonical_request: String,
    pub signature: String,
}

/// Signs requests against a single bucket.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    bucket: String,
    region: String,
    scheme: &'static str,
    host: String,
    credentials: Credentials,
}

impl RequestSigner {
    /// Signer for `bucket` using the regional virtual-hosted endpoint
    /// `<bucket>.s3.<region>.amazonaws.com`.
    pub fn new(bucket: &str, region: &str, credentials: Credentials) -> Self {
        Self {
            scheme: "https",
            host: format!("{bucket}.s3.{region}.amazonaws.com"),
            bucket: bucket.to_string(),
            region: region.to_string(),
            credentials,
        }
    }

    /// Override the endpoint, for S3-compatible stores with their own
    /// domain. Accepts `host[:port]` (HTTPS) or `http://` / `https://`
    /// followed by `host[:port]`.
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        let endpoint = endpoint.trim().trim_end_matches('/');
        let (scheme, host) = match endpoint.split_once("://") {
            Some((scheme, host)) if scheme.eq_ignore_ascii_case("http") => ("http", host),
            Some((_, host)) => ("https", host),
            None => ("https", endpoint),
        };
        self.scheme = scheme;
        self.host = host.to_string();
        self
    }

    /// Build a presigned URL for `method` on `key`, valid for
    /// [`PRESIGN_EXPIRES_SECS`] from `at`.
    pub fn presign(&self, method: &str, key: &str, at: Timestamp) -> PresignedUrl {
        self.presign_with_expiry(method, key, at, PRESIGN_EXPIRES_SECS)
    }

    fn presign_with_expiry(
        &self,
        method: &str,
        key: &str,
        at: Timestamp,
        expires_secs: u32,
    ) -> PresignedUrl {
        let amz_date = amz_date(at);
        let scope = self.credential_scope(&amz_date);
        let canonical_uri = canonical_uri(key);

        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), self.host.clone());
        let (canonical_headers, signed_headers) = canonicalize_headers(&headers);

        let credential = format!("{}/{scope}", self.credentials.access_key);
        let canonical_query = format!(
            "X-Amz-Algorithm={ALGORITHM}\
             &X-Amz-Credential={}\
             &X-Amz-Date={amz_date}\
             &X-Amz-Expires={expires_secs}\
             &X-Amz-SignedHeaders={}",
            uri_encode(&credential),
            uri_encode(&signed_headers),
        );

        let canonical_request = canonical_request(
            method,
            &canonical_uri,
            &canonical_query,
            &canonical_headers,
            &signed_headers,
            UNSIGNED_PAYLOAD,
        );
        let signature = self.signature(&amz_date, &scope, &canonical_request);

        PresignedUrl {
            url: format!(
                "{}://{}{canonical_uri}?{canonical_query}&X-Amz-Signature={signature}",
                self.scheme, self.host
            ),
            canonical_request,
            signature,
        }
    }

    /// Sign a server-side copy of `source_key` to `dest_key` within the
    /// bucket.
    pub fn sign_copy(&self, source_key: &str, dest_key: &str, at: Timestamp) -> SignedRequest {
        let copy_source = format!("/{}{}", self.bucket, canonical_uri(source_key));
        self.sign_with_headers(
            "PUT",
            dest_key,
            &[("x-amz-copy-source", &copy_source)],
            UNSIGNED_PAYLOAD,
            at,
        )
    }

    /// Sign an arbitrary header-authenticated request.
    ///
    /// `host`, `x-amz-content-sha256` and `x-amz-date` are always added to
    /// the signed set; `extra_headers` are lower-cased and merged in.
    pub fn sign_with_headers(
        &self,
        method: &str,
        key: &str,
        extra_headers: &[(&str, &str)],
        payload_hash: &str,
        at: Timestamp,
    ) -> SignedRequest {
        let amz_date = amz_date(at);
        let scope = self.credential_scope(&amz_date);
        let canonical_uri = canonical_uri(key);

        let mut headers = BTreeMap::new();
        headers.insert("host".to_string(), self.host.clone());
        headers.insert("x-amz-content-sha256".to_string(), payload_hash.to_string());
        headers.insert("x-amz-date".to_string(), amz_date.clone());
        for (name, value) in extra_headers {
            headers.insert(name.to_lowercase(), value.trim().to_string());
        }
        let (canonical_headers, signed_headers) = canonicalize_headers(&headers);

        let canonical_request = canonical_request(
            method,
            &canonical_uri,
            "",
            &canonical_headers,
            &signed_headers,
            payload_hash,
        );
        let signature = self.signature(&amz_date, &scope, &canonical_request);

        let authorization = format!(
            "{ALGORITHM} Credential={}/{scope}, SignedHeaders={signed_headers}, Signature={signature}",
            self.credentials.access_key
        );

        let mut out: Vec<(String, String)> = headers
            .into_iter()
            .filter(|(name, _)| name != "host")
            .collect();
        out.push(("authorization".to_string(), authorization));

        SignedRequest {
            method: method.to_string(),
            url: format!("{}://{}{canonical_uri}", self.scheme, self.host),
            headers: out,
            canonical_request,
            signature,
        }
    }

    fn credential_scope(&self, amz_date: &str) -> String {
        format!("{}/{}/{SERVICE}/{TERMINATOR}", date_stamp(amz_date), self.region)
    }

    fn signature(&self, amz_date: &str, scope: &str, canonical_request: &str) -> String {
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );
        let key = signing_key(
            &self.credentials.secret_key,
            date_stamp(amz_date),
            &self.region,
        );
        hex::encode(hmac_sha256(&key, string_to_sign.as_bytes()))
    }
}

/// Derive the SigV4 signing key:
/// `HMAC(HMAC(HMAC(HMAC("AWS4" + secret, date), region), service), "aws4_request")`.
pub fn signing_key(secret_key: &str, date: &str, region: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes());
    hmac_sha256(&k_service, TERMINATOR.as_bytes())
}

/// Compact ISO-8601 timestamp, e.g. `20130524T000000Z`.
pub fn amz_date(at: Timestamp) -> String {
    at.format("%Y%m%dT%H%M%SZ").to_string()
}

fn date_stamp(amz_date: &str) -> &str {
    amz_date.get(..8).unwrap_or(amz_date)
}

/// `/` followed by each path segment percent-encoded on its own.
pub fn canonical_uri(key: &str) -> String {
    let encoded: Vec<String> = key.split('/').map(uri_encode).collect();
    format!("/{}", encoded.join("/"))
}

/// Percent-encode everything except the RFC 3986 unreserved set.
pub fn uri_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Returns `(canonical_headers, signed_headers)`. Keys must already be
/// lower-case; `BTreeMap` keeps them sorted.
fn canonicalize_headers(headers: &BTreeMap<String, String>) -> (String, String) {
    let canonical: String = headers
        .iter()
        .map(|(name, value)| format!("{name}:{value}\n"))
        .collect();
    let signed = headers.keys().cloned().collect::<Vec<_>>().join(";");
    (canonical, signed)
}

fn canonical_request(
    method: &str,
    canonical_uri: &str,
    canonical_query: &str,
    canonical_headers: &str,
    signed_headers: &str,
    payload_hash: &str,
) -> String {
    [
        method,
        canonical_uri,
        canonical_query,
        canonical_headers,
        signed_headers,
        payload_hash,
    ]
    .join("\n")
}
