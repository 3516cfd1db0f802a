use super::{PieceId, PieceKind, PlayerId, ReinforcementPiece, ReservePiece, Role};

/// Per-player bookkeeping. Board pieces live on the [`Board`](crate::state::Board).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PlayerState {
    pub id: PlayerId,
    pub role: Role,
    pub reserve: Vec<ReservePiece>,
    /// Ordered by `queue_position`, head first.
    pub reinforcements: Vec<ReinforcementPiece>,
    pub action_points: u32,
    pub deck_selected: bool,
    /// Set once the attacker's opening general step has been resolved.
    pub general_advanced: bool,
    /// Pieces removed from the board by attacks, in order of destruction.
    pub casualties: Vec<PieceId>,
}

impl PlayerState {
    pub fn new(id: PlayerId, role: Role) -> Self {
        Self {
            id,
            role,
            reserve: Vec::new(),
            reinforcements: Vec::new(),
            action_points: 0,
            deck_selected: false,
            general_advanced: false,
            casualties: Vec::new(),
        }
    }

    pub fn reserve_piece(&self, id: PieceId) -> Option<&ReservePiece> {
        self.reserve.iter().find(|piece| piece.id == id)
    }

    /// Removes a piece from the reserve, keeping the order of the others.
    pub fn take_from_reserve(&mut self, id: PieceId) -> Option<ReservePiece> {
        let index = self.reserve.iter().position(|piece| piece.id == id)?;
        Some(self.reserve.remove(index))
    }

    pub fn reserve_general(&self) -> Option<&ReservePiece> {
        self.reserve
            .iter()
            .find(|piece| piece.kind == PieceKind::General)
    }

    pub fn queue_head(&self) -> Option<&ReinforcementPiece> {
        self.reinforcements.first()
    }

    pub fn queue_entry(&self, id: PieceId) -> Option<&ReinforcementPiece> {
        self.reinforcements.iter().find(|entry| entry.id == id)
    }

    /// Appends a reserve piece to the queue tail. Only an entry that becomes the
    /// head is revealed.
    pub fn enqueue(&mut self, piece: ReservePiece) -> &ReinforcementPiece {
        let position = self.reinforcements.len() as u32;
        let entry = ReinforcementPiece::from_reserve(piece, position, position == 0);
        self.reinforcements.push(entry);
        &self.reinforcements[self.reinforcements.len() - 1]
    }

    /// Removes the head, renumbers the rest and reveals the new head.
    ///
    /// Returns the removed entry and the id of the newly revealed head.
    pub fn dequeue_head(&mut self) -> Option<(ReinforcementPiece, Option<PieceId>)> {
        if self.reinforcements.is_empty() {
            return None;
        }
        let head = self.reinforcements.remove(0);
        for (index, entry) in self.reinforcements.iter_mut().enumerate() {
            entry.queue_position = index as u32;
            entry.face_up = index == 0;
        }
        let revealed = self.reinforcements.first().map(|entry| entry.id);
        Some((head, revealed))
    }
}

/// Both seats, addressable by [`PlayerId`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Players {
    pub player1: PlayerState,
    pub player2: PlayerState,
}

impl Players {
    pub fn new(player1_role: Role) -> Self {
        let player2_role = match player1_role {
            Role::Attacker => Role::Defender,
            Role::Defender => Role::Attacker,
        };
        Self {
            player1: PlayerState::new(PlayerId::Player1, player1_role),
            player2: PlayerState::new(PlayerId::Player2, player2_role),
        }
    }

    pub fn get(&self, id: PlayerId) -> &PlayerState {
        match id {
            PlayerId::Player1 => &self.player1,
            PlayerId::Player2 => &self.player2,
        }
    }

    pub fn get_mut(&mut self, id: PlayerId) -> &mut PlayerState {
        match id {
            PlayerId::Player1 => &mut self.player1,
            PlayerId::Player2 => &mut self.player2,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlayerState> {
        [&self.player1, &self.player2].into_iter()
    }

    pub fn with_role(&self, role: Role) -> &PlayerState {
        if self.player1.role == role {
            &self.player1
        } else {
            &self.player2
        }
    }
}
