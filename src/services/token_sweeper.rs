use sea_orm::DbErr;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::config::PurgeConfig;
use crate::services::clock::Clock;
use crate::services::token_store::TokenStore;

/// Supprime les tokens expirés depuis plus de `retention`
pub async fn sweep_once(
    store: &dyn TokenStore,
    clock: &dyn Clock,
    retention: std::time::Duration,
) -> Result<u64, DbErr> {
    let retention = chrono::Duration::from_std(retention)
        .map_err(|e| DbErr::Custom(format!("invalid retention: {e}")))?;
    store.purge_expired(clock.now() - retention).await
}

/// Lance le nettoyage périodique (tâche tokio, stoppée par `abort` à l'arrêt)
pub fn spawn_sweeper(
    store: Arc<dyn TokenStore>,
    clock: Arc<dyn Clock>,
    config: PurgeConfig,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match sweep_once(store.as_ref(), clock.as_ref(), config.retention).await {
                Ok(0) => {}
                Ok(deleted) => tracing::info!(deleted, "🧹 expired tokens purged"),
                Err(e) => tracing::error!(error = %e, "token purge failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::tokens::NewToken;
    use crate::services::testing::{InMemoryTokenStore, ManualClock};
    use chrono::Duration;

    #[tokio::test]
    async fn test_sweep_keeps_live_and_recent_tokens() {
        let store = InMemoryTokenStore::default();
        let clock = ManualClock::at_t0();
        let t0 = clock.now();

        for (code, minutes_ago) in [("111111", 30), ("222222", 3), ("333333", 0)] {
            let issued_at = t0 - Duration::minutes(minutes_ago);
            store
                .put(NewToken {
                    client_name: "Ana".to_string(),
                    client_email: "ana@x.com".to_string(),
                    code: code.to_string(),
                    issued_at,
                    expires_at: issued_at + Duration::minutes(5),
                })
                .await
                .unwrap();
        }

        // 111111 a expiré il y a 25 min (> 10 min de rétention), 222222 expire dans 2 min
        let deleted = sweep_once(&store, &clock, std::time::Duration::from_secs(600))
            .await
            .unwrap();

        assert_eq!(deleted, 1);
        let codes: Vec<String> = store.all().await.into_iter().map(|t| t.code).collect();
        assert_eq!(codes, vec!["222222", "333333"]);
    }
}
