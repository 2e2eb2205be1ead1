//! ドメイン識別子（型付き ID）
//!
//! ID は phantom 型付きの `Id<T>` で包んだ ULID で、別種の識別子を取り違えられない。
//! ULID は生成時刻順に並び、協調なしで生成できる。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use ulid::Ulid;

/// ID 型の表示用プレフィックスを与えるマーカートレイト
pub trait IdMarker: Send + Sync + 'static {
    fn prefix() -> &'static str;
}

/// 汎用 ID 型
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Id<T: IdMarker> {
    ulid: Ulid,
    #[serde(skip)]
    _marker: PhantomData<T>,
}

impl<T: IdMarker> Id<T> {
    pub fn from_ulid(ulid: Ulid) -> Self {
        Self {
            ulid,
            _marker: PhantomData,
        }
    }

    pub fn as_ulid(&self) -> Ulid {
        self.ulid
    }
}

impl<T: IdMarker> From<Ulid> for Id<T> {
    fn from(ulid: Ulid) -> Self {
        Self::from_ulid(ulid)
    }
}

impl<T: IdMarker> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", T::prefix(), self.ulid)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid id {0:?}")]
pub struct InvalidId(pub String);

impl<T: IdMarker> FromStr for Id<T> {
    type Err = InvalidId;

    /// 表示形式（`session-01H...`）と素の ULID の両方を受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim();
        let body = raw.strip_prefix(T::prefix()).unwrap_or(raw);
        Ulid::from_string(body)
            .map(Self::from_ulid)
            .map_err(|_| InvalidId(s.to_string()))
    }
}

// ========================================
// マーカー型
// ========================================

/// 会話セッションのマーカー
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Session {}

impl IdMarker for Session {
    fn prefix() -> &'static str {
        "session-"
    }
}

/// 会話の識別子。状態の永続化キー
pub type SessionId = Id<Session>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_has_prefix_and_parses_back() {
        let ulid = Ulid::new();
        let id = SessionId::from_ulid(ulid);
        let shown = id.to_string();
        assert!(shown.starts_with("session-"));

        let parsed: SessionId = shown.parse().unwrap();
        assert_eq!(parsed, id);

        let bare: SessionId = ulid.to_string().parse().unwrap();
        assert_eq!(bare, id);
    }

    #[test]
    fn garbage_does_not_parse() {
        assert!("session-nope".parse::<SessionId>().is_err());
    }

    #[test]
    fn ids_are_sortable() {
        let id1 = SessionId::from_ulid(Ulid::new());
        std::thread::sleep(std::time::Duration::from_millis(2));
        let id2 = SessionId::from_ulid(Ulid::new());
        assert!(id1 < id2);
    }

    #[test]
    fn phantom_data_does_not_consume_memory() {
        use std::mem::size_of;
        assert_eq!(size_of::<SessionId>(), size_of::<Ulid>());
    }

    #[test]
    fn ids_can_be_serialized() {
        let id = SessionId::from_ulid(Ulid::new());
        let s = serde_json::to_string(&id).unwrap();
        let back: SessionId = serde_json::from_str(&s).unwrap();
        assert_eq!(back, id);
    }
}
