use crate::error::PacError;
use reqwest::blocking::Client;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Loads PAC script text from an `http(s)://` or `file://` URL, or from a
/// plain filesystem path.
pub fn load_pac(location: &str, timeout: Duration) -> Result<String, PacError> {
    match Url::parse(location) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => download_pac(url.as_str(), timeout),
        Ok(url) if url.scheme() == "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| PacError::Io(std::io::Error::other(format!("bad file URL: {url}"))))?;
            read_pac(&path)
        }
        _ => read_pac(Path::new(location)),
    }
}

pub fn download_pac(pac_url: &str, timeout: Duration) -> Result<String, PacError> {
    info!("Downloading PAC script from: {}", pac_url);

    let client = Client::builder().timeout(timeout).build()?;

    let response = client.get(pac_url).send()?;

    if !response.status().is_success() {
        error!("PAC download failed: HTTP {}", response.status());
        return Err(PacError::Status(response.status()));
    }

    let text = response.text()?;
    info!("PAC script downloaded successfully ({} bytes)", text.len());
    Ok(text)
}

fn read_pac(path: &Path) -> Result<String, PacError> {
    info!("Reading PAC script from: {}", path.display());
    let text = std::fs::read_to_string(path)?;
    Ok(text)
}
