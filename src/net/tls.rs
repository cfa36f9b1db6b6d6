//! TLS configuration and certificate loading.

use std::path::Path;

use axum_server::tls_rustls::RustlsConfig;

use crate::config::TlsFiles;

/// Load a rustls configuration from PEM certificate and key files.
pub async fn load_tls_config(files: &TlsFiles) -> Result<RustlsConfig, std::io::Error> {
    ensure_exists(&files.certificate, "Certificate")?;
    ensure_exists(&files.key, "Private key")?;

    RustlsConfig::from_pem_file(&files.certificate, &files.key).await
}

fn ensure_exists(path: &Path, what: &str) -> Result<(), std::io::Error> {
    if path.exists() {
        return Ok(());
    }
    Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("{} file not found: {:?}", what, path),
    ))
}
