use std::future::Future;

use crate::error::AppResult;

/// Runs every task concurrently and waits for all of them
///
/// Results come back in task order. A task that fails (or panics) becomes `None`
/// and never cancels its siblings. Tasks log their own context; this only reports
/// per-stage totals.
pub async fn gather_isolated<T, Fut>(stage: &'static str, tasks: Vec<Fut>) -> Vec<Option<T>>
where
    T: Send + 'static,
    Fut: Future<Output = AppResult<T>> + Send + 'static,
{
    let handles: Vec<_> = tasks.into_iter().map(tokio::spawn).collect();

    let mut results = Vec::with_capacity(handles.len());
    let mut error_count = 0usize;

    for handle in handles {
        match handle.await {
            Ok(Ok(value)) => results.push(Some(value)),
            Ok(Err(e)) => {
                tracing::debug!(stage = stage, error = %e, "Batch item failed");
                error_count += 1;
                results.push(None);
            }
            Err(e) => {
                tracing::error!(stage = stage, error = %e, "Task join error");
                error_count += 1;
                results.push(None);
            }
        }
    }

    if error_count > 0 {
        tracing::warn!(
            stage = stage,
            success_count = results.len() - error_count,
            error_count = error_count,
            "Partial batch failure"
        );
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use std::time::Duration;

    #[tokio::test]
    async fn test_results_keep_task_order() {
        let tasks: Vec<_> = [30u64, 0, 10]
            .into_iter()
            .map(|delay| async move {
                tokio::time::sleep(Duration::from_millis(delay)).await;
                Ok::<_, AppError>(delay)
            })
            .collect();

        let results = gather_isolated("test", tasks).await;
        assert_eq!(results, vec![Some(30), Some(0), Some(10)]);
    }

    #[tokio::test]
    async fn test_failures_are_isolated() {
        let tasks: Vec<_> = (0..4u32)
            .map(|i| async move {
                if i % 2 == 0 {
                    Ok(i)
                } else {
                    Err(AppError::ExternalApi(format!("item {} failed", i)))
                }
            })
            .collect();

        let results = gather_isolated("test", tasks).await;
        assert_eq!(results, vec![Some(0), None, Some(2), None]);
    }

    #[tokio::test]
    async fn test_empty_batch() {
        let tasks: Vec<std::future::Ready<AppResult<u8>>> = Vec::new();
        assert!(gather_isolated("test", tasks).await.is_empty());
    }
}
