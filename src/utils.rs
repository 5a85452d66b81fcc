use std::future::Future;

use once_cell::sync::Lazy;

/// Runtime that performs all HTTP I/O. UI state never lives here; callers on
/// the main context await the spawned task and apply the result themselves.
pub static RUNTIME: Lazy<tokio::runtime::Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build Tokio runtime")
});

/// Runs `fut` on the I/O runtime and resolves on whichever executor awaits it.
pub async fn on_runtime<T, F>(fut: F) -> Result<T, tokio::task::JoinError>
where
    T: Send + 'static,
    F: Future<Output = T> + Send + 'static,
{
    RUNTIME.spawn(fut).await
}

pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_keeps_scheme_and_defaults_to_https() {
        assert_eq!(normalize_url(" http://localhost:8000 "), "http://localhost:8000");
        assert_eq!(normalize_url("api.example.com"), "https://api.example.com");
    }

    #[test]
    fn on_runtime_resolves_outside_the_runtime() {
        let value = block_on(on_runtime(async { 40 + 2 }));
        assert_eq!(value.unwrap(), 42);
    }

    fn block_on<F: Future>(fut: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap()
            .block_on(fut)
    }
}
