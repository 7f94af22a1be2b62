/// Stable shark identifier, assigned at spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SharkId(pub u32);

/// Marks the shark the rest of the school follows.
#[derive(Debug, Clone, Copy)]
pub struct Leader;

/// Marks a shark spawned by multi-instance mode (despawned when disabled).
#[derive(Debug, Clone, Copy)]
pub struct Follower;

/// Top-level behavior state. Exactly one is active per shark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BehaviorState {
    Patrol,
    Stalking,
    Alert,
    Circling,
    Hunt,
    Seeking,
    Attacking,
    Eating,
}

impl BehaviorState {
    pub fn label(self) -> &'static str {
        match self {
            BehaviorState::Patrol => "Patrol",
            BehaviorState::Stalking => "Stalking",
            BehaviorState::Alert => "Alert",
            BehaviorState::Circling => "Circling",
            BehaviorState::Hunt => "Hunt",
            BehaviorState::Seeking => "Seeking",
            BehaviorState::Attacking => "Attacking",
            BehaviorState::Eating => "Eating",
        }
    }
}

/// Autonomous motion pattern, meaningful only while in `Patrol`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum IdleBehavior {
    SimplePatrol,
    FigureEight,
    DepthDiving,
    Zigzag,
    EdgeExplore,
    RandomExplore,
    CircleArea,
    RestPause,
    SlowDrift,
}

impl IdleBehavior {
    pub const ALL: [IdleBehavior; 9] = [
        Self::SimplePatrol,
        Self::FigureEight,
        Self::DepthDiving,
        Self::Zigzag,
        Self::EdgeExplore,
        Self::RandomExplore,
        Self::CircleArea,
        Self::RestPause,
        Self::SlowDrift,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::SimplePatrol => "simple-patrol",
            Self::FigureEight => "figure-8",
            Self::DepthDiving => "depth-diving",
            Self::Zigzag => "zigzag",
            Self::EdgeExplore => "edge-explore",
            Self::RandomExplore => "random-explore",
            Self::CircleArea => "circle-area",
            Self::RestPause => "rest",
            Self::SlowDrift => "slow-drift",
        }
    }

    /// Horizontal-drift behaviors wrap at the screen edges.
    pub fn wraps(self) -> bool {
        matches!(
            self,
            Self::SimplePatrol | Self::DepthDiving | Self::Zigzag | Self::SlowDrift
        )
    }
}

/// Energy band used to pick idle-behavior candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnergyTier {
    High,
    Medium,
    Low,
}

impl EnergyTier {
    pub fn candidates(self) -> &'static [IdleBehavior] {
        match self {
            EnergyTier::High => &[
                IdleBehavior::Zigzag,
                IdleBehavior::FigureEight,
                IdleBehavior::EdgeExplore,
                IdleBehavior::RandomExplore,
                IdleBehavior::CircleArea,
            ],
            EnergyTier::Medium => &[
                IdleBehavior::SimplePatrol,
                IdleBehavior::DepthDiving,
                IdleBehavior::RandomExplore,
            ],
            EnergyTier::Low => &[
                IdleBehavior::RestPause,
                IdleBehavior::SlowDrift,
                IdleBehavior::SimplePatrol,
            ],
        }
    }
}

/// Why a transition fired. Kept in the transition history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionReason {
    PointerDetected,
    PointerSpotted,
    PointerStill,
    StalkTimeout,
    PointerClose,
    SeekTimeout,
    DirectHit,
    ClickAbandoned,
    CirclingTimeout,
    HuntTimeout,
    AttackTimeout,
    Click,
    PointerMoved,
    Bite,
    InputAfterAttack,
    Respawn,
}

impl TransitionReason {
    pub fn label(self) -> &'static str {
        match self {
            Self::PointerDetected => "pointer in detection range",
            Self::PointerSpotted => "pointer in stalking range",
            Self::PointerStill => "pointer resting on click point",
            Self::StalkTimeout => "stalk timed out",
            Self::PointerClose => "pointer close",
            Self::SeekTimeout => "seek timed out",
            Self::DirectHit => "pointer still on click point",
            Self::ClickAbandoned => "pointer left click point",
            Self::CirclingTimeout => "circling timed out",
            Self::HuntTimeout => "hunt timed out",
            Self::AttackTimeout => "attack missed",
            Self::Click => "click",
            Self::PointerMoved => "pointer moved",
            Self::Bite => "bite",
            Self::InputAfterAttack => "input after attack",
            Self::Respawn => "respawn",
        }
    }
}
