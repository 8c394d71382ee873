//! Téléchargement en tâche de fond d'une source audio
//!
//! Un [`Download`] suit la progression d'une écriture vers le fichier de
//! destination. Le cache s'en sert pour dédupliquer les demandes
//! concurrentes sur une même piste et garantir qu'un fichier n'est visible
//! qu'une fois complet.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWriteExt};
use tokio::sync::RwLock;

/// Délai maximum pour le téléchargement complet d'une piste
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// État interne du téléchargement
#[derive(Debug, Clone)]
struct DownloadState {
    /// Octets écrits dans le fichier de destination
    bytes_written: u64,
    /// Taille attendue (Content-Length, si connue)
    expected_size: Option<u64>,
    /// Téléchargement terminé (succès ou échec)
    finished: bool,
    /// Erreur éventuelle
    error: Option<String>,
}

/// Téléchargement en cours vers un fichier du cache
#[derive(Debug)]
pub struct Download {
    filename: PathBuf,
    state: Arc<RwLock<DownloadState>>,
}

impl Download {
    fn new(filename: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            filename,
            state: Arc::new(RwLock::new(DownloadState {
                bytes_written: 0,
                expected_size: None,
                finished: false,
                error: None,
            })),
        })
    }

    /// Chemin du fichier de destination
    pub fn filename(&self) -> &Path {
        &self.filename
    }

    /// Attend la fin du téléchargement
    ///
    /// Retourne le nombre d'octets écrits, ou l'erreur survenue.
    pub async fn wait_until_finished(&self) -> Result<u64, String> {
        loop {
            {
                let state = self.state.read().await;
                if let Some(ref error) = state.error {
                    return Err(error.clone());
                }
                if state.finished {
                    return Ok(state.bytes_written);
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    /// Octets écrits jusqu'ici
    pub async fn bytes_written(&self) -> u64 {
        self.state.read().await.bytes_written
    }

    /// Taille attendue du fichier, si le serveur l'a annoncée
    pub async fn expected_size(&self) -> Option<u64> {
        self.state.read().await.expected_size
    }

    /// Téléchargement terminé ?
    pub async fn finished(&self) -> bool {
        self.state.read().await.finished
    }

    /// Erreur éventuelle
    pub async fn error(&self) -> Option<String> {
        self.state.read().await.error.clone()
    }

    async fn fail(state: &Arc<RwLock<DownloadState>>, error: String) {
        let mut s = state.write().await;
        s.error = Some(error);
        s.finished = true;
    }
}

/// Lance le téléchargement d'une URL vers un fichier, en tâche de fond
pub fn download<P: AsRef<Path>>(filename: P, url: &str) -> Arc<Download> {
    let filename = filename.as_ref().to_path_buf();
    let url = url.to_string();

    let dl = Download::new(filename.clone());
    let state = Arc::clone(&dl.state);

    tokio::spawn(async move {
        if let Err(e) = download_impl(&filename, &url, &state).await {
            tracing::warn!(url = %url, error = %e, "Audio download failed");
        }
    });

    dl
}

/// Ingeste un flux asynchrone déjà ouvert vers un fichier, en tâche de fond
///
/// Même contrat que [`download`], mais la source est un reader arbitraire.
/// Sert aux tests et aux imports locaux.
pub fn ingest<P, R>(filename: P, reader: R) -> Arc<Download>
where
    P: AsRef<Path>,
    R: AsyncRead + Unpin + Send + 'static,
{
    let filename = filename.as_ref().to_path_buf();

    let dl = Download::new(filename.clone());
    let state = Arc::clone(&dl.state);

    tokio::spawn(async move {
        if let Err(e) = ingest_impl(&filename, reader, &state).await {
            tracing::warn!(file = %filename.display(), error = %e, "Audio ingest failed");
        }
    });

    dl
}

async fn download_impl(
    filename: &Path,
    url: &str,
    state: &Arc<RwLock<DownloadState>>,
) -> Result<(), String> {
    use futures_util::StreamExt;

    let client = reqwest::Client::builder()
        .timeout(DOWNLOAD_TIMEOUT)
        .build()
        .map_err(|e| e.to_string())?;

    let response = match client.get(url).send().await {
        Ok(r) => r,
        Err(e) => {
            let error = format!("Failed to fetch URL: {}", e);
            Download::fail(state, error.clone()).await;
            return Err(error);
        }
    };

    if !response.status().is_success() {
        let error = format!("HTTP error: {}", response.status());
        Download::fail(state, error.clone()).await;
        return Err(error);
    }

    if let Some(content_length) = response.content_length() {
        state.write().await.expected_size = Some(content_length);
    }

    let mut file = match tokio::fs::File::create(filename).await {
        Ok(f) => f,
        Err(e) => {
            let error = format!("Failed to create file: {}", e);
            Download::fail(state, error.clone()).await;
            return Err(error);
        }
    };

    let mut stream = response.bytes_stream();
    while let Some(chunk_result) = stream.next().await {
        let chunk = match chunk_result {
            Ok(c) => c,
            Err(e) => {
                let error = format!("Failed to read chunk: {}", e);
                Download::fail(state, error.clone()).await;
                return Err(error);
            }
        };

        if let Err(e) = file.write_all(&chunk).await {
            let error = format!("Failed to write to file: {}", e);
            Download::fail(state, error.clone()).await;
            return Err(error);
        }

        state.write().await.bytes_written += chunk.len() as u64;
    }

    if let Err(e) = file.flush().await {
        let error = format!("Failed to flush file: {}", e);
        Download::fail(state, error.clone()).await;
        return Err(error);
    }

    state.write().await.finished = true;
    Ok(())
}

async fn ingest_impl<R>(
    filename: &Path,
    mut reader: R,
    state: &Arc<RwLock<DownloadState>>,
) -> Result<(), String>
where
    R: AsyncRead + Unpin + Send,
{
    let mut file = match tokio::fs::File::create(filename).await {
        Ok(f) => f,
        Err(e) => {
            let error = format!("Failed to create file: {}", e);
            Download::fail(state, error.clone()).await;
            return Err(error);
        }
    };

    match tokio::io::copy(&mut reader, &mut file).await {
        Ok(written) => {
            if let Err(e) = file.flush().await {
                let error = format!("Failed to flush file: {}", e);
                Download::fail(state, error.clone()).await;
                return Err(error);
            }
            let mut s = state.write().await;
            s.bytes_written = written;
            s.finished = true;
            Ok(())
        }
        Err(e) => {
            let error = format!("Failed to copy stream: {}", e);
            Download::fail(state, error.clone()).await;
            Err(error)
        }
    }
}
