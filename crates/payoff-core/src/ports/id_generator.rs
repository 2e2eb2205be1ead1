//! IdGenerator port - セッション ID の生成
//!
//! # 実装
//! - **UlidGenerator**: [`Clock`] の時刻を使う ULID ベース

use crate::domain::ids::SessionId;
use crate::ports::Clock;
use ulid::Ulid;

/// IdGenerator は新しいセッション ID を払い出す
///
/// # ULID の特性
/// - 生成時刻でソート可能
/// - 生成器間の協調が不要
/// - 128-bit
pub trait IdGenerator: Send + Sync {
    fn generate_session_id(&self) -> SessionId;
}

/// UlidGenerator は時計の時刻とランダムビットから ULID を作る
///
/// `FixedClock` を使うとタイムスタンプ部分は決定的になる。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_session_id(&self) -> SessionId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        let ulid = Ulid::from_parts(timestamp_ms, rand::random());
        SessionId::from(ulid)
    }
}
