//! 철회 권한 술어
//!
//! 철회 신호를 보낸 행위자가 게시물을 철회할 자격이 있는지 판정합니다.
//! 판정은 순수 함수이며 설정에서 로드된 두 ID 집합에만 의존합니다.

use std::collections::HashSet;

use logvet_core::config::RetractionConfig;
use logvet_core::types::{ActorId, ActorIdentity, RankId};

/// 철회 권한 정책
///
/// 행위자 ID가 `privileged_actors`에 있거나, 행위자의 최상위 직급 ID가
/// `privileged_ranks`에 있으면 권한이 있습니다.
#[derive(Debug, Clone, Default)]
pub struct AuthorizationPolicy {
    privileged_actors: HashSet<ActorId>,
    privileged_ranks: HashSet<RankId>,
}

impl AuthorizationPolicy {
    /// ID 집합으로 정책을 생성합니다.
    pub fn new(
        privileged_actors: impl IntoIterator<Item = ActorId>,
        privileged_ranks: impl IntoIterator<Item = RankId>,
    ) -> Self {
        Self {
            privileged_actors: privileged_actors.into_iter().collect(),
            privileged_ranks: privileged_ranks.into_iter().collect(),
        }
    }

    /// 설정 섹션에서 정책을 생성합니다.
    pub fn from_config(config: &RetractionConfig) -> Self {
        Self::new(
            config.privileged_actors.iter().copied().map(ActorId),
            config.privileged_ranks.iter().copied().map(RankId),
        )
    }

    /// 행위자가 철회 권한을 가지는지 판정합니다.
    pub fn is_authorized(&self, identity: &ActorIdentity) -> bool {
        if self.privileged_actors.contains(&identity.actor_id) {
            return true;
        }
        match identity.top_rank_id {
            Some(rank) => self.privileged_ranks.contains(&rank),
            None => false,
        }
    }
}
