//! Command rejection errors.
//!
//! One error type covers every command so the runtime can classify any
//! rejection through [`GameError::kind`].

use crate::error::{ErrorKind, ErrorSeverity, GameError};
use crate::state::{Ability, Phase, PieceId, PlayerId, Position, StateError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionError {
    // ----- not found -----
    #[error("piece {0} is not on the board")]
    PieceNotFound(PieceId),

    #[error("piece {0} is not in the reserve")]
    NotInReserve(PieceId),

    #[error("piece {0} is not in the reinforcement queue")]
    NotQueued(PieceId),

    #[error("{0} has no general left to place")]
    GeneralMissing(PlayerId),

    // ----- phase -----
    #[error("command not accepted during {actual}")]
    WrongPhase { actual: Phase },

    #[error("game is finished")]
    GameFinished,

    #[error("{player} has {queued} reinforcements configured, {required} required")]
    SetupIncomplete {
        player: PlayerId,
        queued: usize,
        required: usize,
    },

    // ----- turn -----
    #[error("{player} acted during {current}'s turn")]
    NotYourTurn {
        player: PlayerId,
        current: PlayerId,
    },

    // ----- resources -----
    #[error("no action points remaining")]
    NoActionPoints,

    #[error("{ability} has no charges left on piece {piece}")]
    NoChargesLeft { piece: PieceId, ability: Ability },

    // ----- targets -----
    #[error("position {0} is off the board")]
    OutOfBounds(Position),

    #[error("position {0} is outside the active field")]
    OutsideActiveField(Position),

    #[error("piece {piece} does not belong to {player}")]
    NotOwner { piece: PieceId, player: PlayerId },

    #[error("piece {0} is still in the reinforcement column")]
    InReinforcementColumn(PieceId),

    #[error("piece {0} is not an enemy")]
    NotAnEnemy(PieceId),

    #[error("piece {piece} at {position} is outside allied influence")]
    OutsideInfluence { piece: PieceId, position: Position },

    #[error("{to} is not reachable by piece {piece}")]
    NotInMovementZone { piece: PieceId, to: Position },

    #[error("piece {target} is not within the attack zone of piece {piece}")]
    NotInAttackZone { piece: PieceId, target: PieceId },

    #[error("cell {0} is occupied")]
    Occupied(Position),

    #[error("piece {0} is not at the head of the reinforcement queue")]
    NotQueueHead(PieceId),

    #[error("deployment must target row {expected}, got row {actual}")]
    NotDeploymentRow { expected: i32, actual: i32 },

    #[error("an enemy piece holds the deployment row")]
    DeploymentBlocked,

    #[error("piece {piece} has no ability {ability}")]
    UnknownAbility { piece: PieceId, ability: Ability },

    #[error("reinforcement slot {0} is occupied")]
    SlotOccupied(Position),

    #[error("general {0} cannot join the reinforcement queue")]
    GeneralNotQueueable(PieceId),

    #[error("{player} must place the general in its own half, got {position}")]
    OutsideOwnHalf {
        player: PlayerId,
        position: Position,
    },

    // ----- malformed -----
    #[error("deck must contain exactly {expected} pieces, got {actual}")]
    DeckSize { expected: usize, actual: usize },

    #[error("decks may not include a general")]
    GeneralInDeck,

    #[error("{0} already selected a deck")]
    DeckAlreadySelected(PlayerId),

    #[error("exactly {expected} reinforcement pieces required, got {actual}")]
    ReinforcementCount { expected: usize, actual: usize },

    #[error("piece {0} is listed more than once")]
    DuplicatePiece(PieceId),

    #[error("{0} already configured reinforcements")]
    ReinforcementsAlreadyConfigured(PlayerId),

    #[error("{0} already placed the general")]
    GeneralAlreadyPlaced(PlayerId),

    #[error("a reserve piece is required when adding a reinforcement")]
    MissingReservePiece,

    // ----- internal -----
    #[error("state invariant violated: {0}")]
    Invariant(#[from] StateError),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::NotFound | ErrorKind::MalformedCommand => ErrorSeverity::Validation,
            ErrorKind::InvalidPhase
            | ErrorKind::NotYourTurn
            | ErrorKind::OutOfResource
            | ErrorKind::IllegalTarget => ErrorSeverity::Recoverable,
            ErrorKind::Internal => ErrorSeverity::Internal,
        }
    }

    fn kind(&self) -> ErrorKind {
        use ActionError::*;
        match self {
            PieceNotFound(_) | NotInReserve(_) | NotQueued(_) | GeneralMissing(_) => {
                ErrorKind::NotFound
            }
            WrongPhase { .. } | GameFinished | SetupIncomplete { .. } => ErrorKind::InvalidPhase,
            NotYourTurn { .. } => ErrorKind::NotYourTurn,
            NoActionPoints | NoChargesLeft { .. } => ErrorKind::OutOfResource,
            OutOfBounds(_)
            | OutsideActiveField(_)
            | NotOwner { .. }
            | InReinforcementColumn(_)
            | NotAnEnemy(_)
            | OutsideInfluence { .. }
            | NotInMovementZone { .. }
            | NotInAttackZone { .. }
            | Occupied(_)
            | NotQueueHead(_)
            | NotDeploymentRow { .. }
            | DeploymentBlocked
            | UnknownAbility { .. }
            | SlotOccupied(_)
            | GeneralNotQueueable(_)
            | OutsideOwnHalf { .. } => ErrorKind::IllegalTarget,
            DeckSize { .. }
            | GeneralInDeck
            | DeckAlreadySelected(_)
            | ReinforcementCount { .. }
            | DuplicatePiece(_)
            | ReinforcementsAlreadyConfigured(_)
            | GeneralAlreadyPlaced(_)
            | MissingReservePiece => ErrorKind::MalformedCommand,
            Invariant(_) => ErrorKind::Internal,
        }
    }

    fn error_code(&self) -> &'static str {
        use ActionError::*;
        match self {
            PieceNotFound(_) => "ACTION_PIECE_NOT_FOUND",
            NotInReserve(_) => "ACTION_NOT_IN_RESERVE",
            NotQueued(_) => "ACTION_NOT_QUEUED",
            GeneralMissing(_) => "ACTION_GENERAL_MISSING",
            WrongPhase { .. } => "ACTION_WRONG_PHASE",
            GameFinished => "ACTION_GAME_FINISHED",
            SetupIncomplete { .. } => "ACTION_SETUP_INCOMPLETE",
            NotYourTurn { .. } => "ACTION_NOT_YOUR_TURN",
            NoActionPoints => "ACTION_NO_ACTION_POINTS",
            NoChargesLeft { .. } => "ACTION_NO_CHARGES_LEFT",
            OutOfBounds(_) => "ACTION_OUT_OF_BOUNDS",
            OutsideActiveField(_) => "ACTION_OUTSIDE_ACTIVE_FIELD",
            NotOwner { .. } => "ACTION_NOT_OWNER",
            InReinforcementColumn(_) => "ACTION_IN_REINFORCEMENT_COLUMN",
            NotAnEnemy(_) => "ACTION_NOT_AN_ENEMY",
            OutsideInfluence { .. } => "ACTION_OUTSIDE_INFLUENCE",
            NotInMovementZone { .. } => "ACTION_NOT_IN_MOVEMENT_ZONE",
            NotInAttackZone { .. } => "ACTION_NOT_IN_ATTACK_ZONE",
            Occupied(_) => "ACTION_OCCUPIED",
            NotQueueHead(_) => "ACTION_NOT_QUEUE_HEAD",
            NotDeploymentRow { .. } => "ACTION_NOT_DEPLOYMENT_ROW",
            DeploymentBlocked => "ACTION_DEPLOYMENT_BLOCKED",
            UnknownAbility { .. } => "ACTION_UNKNOWN_ABILITY",
            SlotOccupied(_) => "ACTION_SLOT_OCCUPIED",
            GeneralNotQueueable(_) => "ACTION_GENERAL_NOT_QUEUEABLE",
            OutsideOwnHalf { .. } => "ACTION_OUTSIDE_OWN_HALF",
            DeckSize { .. } => "ACTION_DECK_SIZE",
            GeneralInDeck => "ACTION_GENERAL_IN_DECK",
            DeckAlreadySelected(_) => "ACTION_DECK_ALREADY_SELECTED",
            ReinforcementCount { .. } => "ACTION_REINFORCEMENT_COUNT",
            DuplicatePiece(_) => "ACTION_DUPLICATE_PIECE",
            ReinforcementsAlreadyConfigured(_) => "ACTION_REINFORCEMENTS_ALREADY_CONFIGURED",
            GeneralAlreadyPlaced(_) => "ACTION_GENERAL_ALREADY_PLACED",
            MissingReservePiece => "ACTION_MISSING_RESERVE_PIECE",
            Invariant(_) => "ACTION_INVARIANT",
        }
    }
}

/// Fails with [`ActionError::WrongPhase`] unless the game is in `expected`.
pub(crate) fn require_phase(actual: Phase, expected: Phase) -> Result<(), ActionError> {
    if actual == Phase::Finished && expected != Phase::Finished {
        return Err(ActionError::GameFinished);
    }
    if actual != expected {
        return Err(ActionError::WrongPhase { actual });
    }
    Ok(())
}
