//! エンティティ
//!
//! Room は 1 つのマッチングセッションを表します。
//! メンバーの参加・離脱、ロール割り当て、ready ハンドシェイク、開始判定を
//! 副作用なしで扱い、排他制御は呼び出し側（Repository / UseCase）が行います。

use std::{collections::HashSet, sync::Arc};

use tokio::sync::{Mutex, OwnedMutexGuard};

use super::{
    error::RoomError,
    value_object::{ConnectionId, Role, RoomCode, Timestamp},
};

/// 1 つの Room に参加できる最大人数
pub const ROOM_CAPACITY: usize = 2;

/// 複数の接続から共有される Room（Room 単位のロック）
pub type SharedRoom = Arc<Mutex<Room>>;

/// 参加直後に呼び出し側へ引き渡される Room のロック
pub type RoomGuard = OwnedMutexGuard<Room>;

/// ロール割り当て
///
/// トークン（接続 ID）をロールごとに保持し、ready のトークン検証に使う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleAssignment {
    pub attacker: ConnectionId,
    pub defender: ConnectionId,
}

impl RoleAssignment {
    /// ルームコードから決定的にロールを割り当てる
    ///
    /// コードポイントの総和が偶数なら先に参加した側が defender、奇数なら attacker。
    pub fn derive(code: &RoomCode, first: ConnectionId, second: ConnectionId) -> Self {
        if code.parity() == 0 {
            Self {
                attacker: second,
                defender: first,
            }
        } else {
            Self {
                attacker: first,
                defender: second,
            }
        }
    }

    pub fn role_of(&self, connection_id: &ConnectionId) -> Option<Role> {
        if &self.attacker == connection_id {
            Some(Role::Attacker)
        } else if &self.defender == connection_id {
            Some(Role::Defender)
        } else {
            None
        }
    }

    pub fn peer_of(&self, connection_id: &ConnectionId) -> Option<&ConnectionId> {
        match self.role_of(connection_id)? {
            Role::Attacker => Some(&self.defender),
            Role::Defender => Some(&self.attacker),
        }
    }

    /// 割り当て済みトークンのいずれかと一致するか
    pub fn is_assigned_token(&self, token: &str) -> bool {
        self.attacker.as_str() == token || self.defender.as_str() == token
    }

    pub fn entries(&self) -> [(&ConnectionId, Role); 2] {
        [
            (&self.attacker, Role::Attacker),
            (&self.defender, Role::Defender),
        ]
    }
}

/// ready を受理した結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadyOutcome {
    /// ready を送った接続のロール
    pub role: Role,
    /// この ready によって Room が開始されたか
    pub started: bool,
}

/// 接続が参加した Room
#[derive(Debug, Clone)]
pub struct JoinedRoom {
    pub code: RoomCode,
    pub room: SharedRoom,
    /// Room がこの参加によって作成されたか
    pub created: bool,
    /// 2 人目の参加でロールが割り当てられた場合のみ Some
    pub roles: Option<RoleAssignment>,
}

/// 離脱の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    MemberRemoved { remaining: usize },
    RoomDeleted,
    NotAMember,
}

/// Room エンティティ
#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    pub members: Vec<ConnectionId>,
    pub roles: Option<RoleAssignment>,
    pub ready: HashSet<ConnectionId>,
    pub started: bool,
    pub created_at: Timestamp,
}

impl Room {
    pub fn new(code: RoomCode, created_at: Timestamp) -> Self {
        Self {
            code,
            members: Vec::with_capacity(ROOM_CAPACITY),
            roles: None,
            ready: HashSet::new(),
            started: false,
            created_at,
        }
    }

    /// メンバーを追加する
    ///
    /// 2 人目の参加時にロールを割り当て、その割り当てを返す。
    /// ロール割り当て済みの Room は 1 人離脱していても新たな参加を受け付けない。
    pub fn join(
        &mut self,
        connection_id: ConnectionId,
    ) -> Result<Option<RoleAssignment>, RoomError> {
        if self.is_member(&connection_id) {
            return Err(RoomError::AlreadyMember(connection_id.to_string()));
        }
        if self.roles.is_some() || self.members.len() >= ROOM_CAPACITY {
            return Err(RoomError::Full);
        }

        self.members.push(connection_id);

        if let [first, second] = self.members.as_slice() {
            let roles = RoleAssignment::derive(&self.code, first.clone(), second.clone());
            self.roles = Some(roles.clone());
            return Ok(Some(roles));
        }
        Ok(None)
    }

    /// メンバーを削除する。削除できた場合 true
    pub fn leave(&mut self, connection_id: &ConnectionId) -> bool {
        let before = self.members.len();
        self.members.retain(|id| id != connection_id);
        self.ready.remove(connection_id);
        self.members.len() != before
    }

    /// ready を受理する
    ///
    /// トークンは送信元の接続に割り当てられたものでなければならない。
    /// 2 人目の ready で `started` が一度だけ true になる。
    pub fn mark_ready(
        &mut self,
        connection_id: &ConnectionId,
        token: &str,
    ) -> Result<ReadyOutcome, RoomError> {
        let roles = self.roles.as_ref().ok_or(RoomError::InvalidToken)?;
        if !roles.is_assigned_token(token) || connection_id.as_str() != token {
            return Err(RoomError::InvalidToken);
        }
        let role = roles.role_of(connection_id).ok_or(RoomError::InvalidToken)?;

        if !self.ready.insert(connection_id.clone()) {
            return Err(RoomError::AlreadyReady(connection_id.to_string()));
        }

        let started = !self.started && self.ready.len() == ROOM_CAPACITY;
        if started {
            self.started = true;
        }

        Ok(ReadyOutcome { role, started })
    }

    /// 中継先の接続。開始前、または相手が離脱済みの場合は None
    pub fn peer_of(&self, connection_id: &ConnectionId) -> Option<&ConnectionId> {
        if !self.started {
            return None;
        }
        self.roles
            .as_ref()?
            .peer_of(connection_id)
            .filter(|peer| self.is_member(peer))
    }

    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    pub fn ready_count(&self) -> usize {
        self.ready.len()
    }
}
