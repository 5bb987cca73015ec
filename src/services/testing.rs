// Doubles de test partagés : store en mémoire, horloge manuelle, notifiers

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sea_orm::DbErr;
use std::sync::Mutex;
use std::sync::atomic::{AtomicI32, Ordering};
use tokio::sync::RwLock;

use crate::error::DeliveryError;
use crate::models::tokens::{NewToken, VerificationToken};
use crate::services::clock::Clock;
use crate::services::notifier::Notifier;
use crate::services::token_store::TokenStore;

/// Store en mémoire, mêmes règles que la requête SQL
#[derive(Default)]
pub struct InMemoryTokenStore {
    rows: RwLock<Vec<VerificationToken>>,
    last_id: AtomicI32,
}

impl InMemoryTokenStore {
    pub async fn all(&self) -> Vec<VerificationToken> {
        self.rows.read().await.clone()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn put(&self, token: NewToken) -> Result<VerificationToken, DbErr> {
        let mut rows = self.rows.write().await;
        let stored = VerificationToken {
            id: self.last_id.fetch_add(1, Ordering::SeqCst) + 1,
            client_name: token.client_name,
            client_email: token.client_email,
            code: token.code,
            issued_at: token.issued_at,
            expires_at: token.expires_at,
        };
        rows.push(stored.clone());
        Ok(stored)
    }

    async fn find_valid(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<VerificationToken>, DbErr> {
        let rows = self.rows.read().await;
        Ok(rows
            .iter()
            .filter(|t| t.code == code && t.is_live_at(now))
            .max_by_key(|t| (t.issued_at, t.id))
            .cloned())
    }

    async fn purge_expired(&self, before: DateTime<Utc>) -> Result<u64, DbErr> {
        let mut rows = self.rows.write().await;
        let initial = rows.len();
        rows.retain(|t| t.expires_at > before);
        Ok((initial - rows.len()) as u64)
    }
}

/// Store dont chaque appel échoue
pub struct BrokenTokenStore;

#[async_trait]
impl TokenStore for BrokenTokenStore {
    async fn put(&self, _token: NewToken) -> Result<VerificationToken, DbErr> {
        Err(DbErr::Custom("database unavailable".to_string()))
    }

    async fn find_valid(
        &self,
        _code: &str,
        _now: DateTime<Utc>,
    ) -> Result<Option<VerificationToken>, DbErr> {
        Err(DbErr::Custom("database unavailable".to_string()))
    }

    async fn purge_expired(&self, _before: DateTime<Utc>) -> Result<u64, DbErr> {
        Err(DbErr::Custom("database unavailable".to_string()))
    }
}

/// Horloge avancée à la main
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Mutex::new(start) }
    }

    /// 2026-03-02 14:00:00 UTC
    pub fn at_t0() -> Self {
        Self::new(Utc.with_ymd_and_hms(2026, 3, 2, 14, 0, 0).unwrap())
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Garde les emails envoyés en mémoire
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<SentMail>>,
}

impl RecordingNotifier {
    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), DeliveryError> {
        self.sent.lock().unwrap().push(SentMail {
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

/// Simule un serveur SMTP en panne
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<(), DeliveryError> {
        Err(DeliveryError("535 authentication failed".to_string()))
    }
}
