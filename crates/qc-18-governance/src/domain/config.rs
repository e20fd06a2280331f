//! # Config Store
//!
//! Bounded governance parameters. Bounds are an explicit value validated once
//! at construction; every setter checks range and rejects no-op updates
//! before committing.

use super::errors::GovernanceError;
use super::value_objects::{Timepoint, Weight};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default quorum denominator (percent).
pub const DEFAULT_QUORUM_DENOMINATOR: u64 = 100;

/// Governance parameter identifiers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigField {
    /// Timepoints between proposal creation and snapshot.
    VotingDelay,
    /// Length of the voting window.
    VotingPeriod,
    /// Minimum power needed to propose.
    ProposalThreshold,
    /// Quorum fraction numerator.
    QuorumNumerator,
    /// Late-quorum deadline extension.
    LateQuorumExtension,
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VotingDelay => "voting_delay",
            Self::VotingPeriod => "voting_period",
            Self::ProposalThreshold => "proposal_threshold",
            Self::QuorumNumerator => "quorum_numerator",
            Self::LateQuorumExtension => "late_quorum_extension",
        };
        f.write_str(name)
    }
}

/// Inclusive `[min, max]` range for one parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bound {
    /// Lower bound (inclusive).
    pub min: u64,
    /// Upper bound (inclusive).
    pub max: u64,
}

impl Bound {
    /// Creates a bound.
    #[must_use]
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// True if `value` lies in the range.
    #[must_use]
    pub fn contains(&self, value: u64) -> bool {
        (self.min..=self.max).contains(&value)
    }

    fn check(&self, field: ConfigField, value: u64) -> Result<(), GovernanceError> {
        if self.contains(value) {
            Ok(())
        } else {
            Err(GovernanceError::ConfigOutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Per-deployment parameter bounds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigBounds {
    /// Voting delay range.
    pub voting_delay: Bound,
    /// Voting period range.
    pub voting_period: Bound,
    /// Proposal threshold range.
    pub proposal_threshold: Bound,
    /// Quorum numerator range.
    pub quorum_numerator: Bound,
    /// Late-quorum extension range.
    pub late_quorum_extension: Bound,
    /// Quorum denominator.
    #[serde(default = "default_denominator")]
    pub quorum_denominator: u64,
}

fn default_denominator() -> u64 {
    DEFAULT_QUORUM_DENOMINATOR
}

impl Default for ConfigBounds {
    /// Second-based bounds: delay 1 minute to 1 week, period 1 hour to
    /// 4 weeks, extension 10 minutes to 1 week.
    fn default() -> Self {
        Self {
            voting_delay: Bound::new(60, 7 * 86_400),
            voting_period: Bound::new(3_600, 28 * 86_400),
            proposal_threshold: Bound::new(1, 10_000),
            quorum_numerator: Bound::new(1, 100),
            late_quorum_extension: Bound::new(600, 7 * 86_400),
            quorum_denominator: DEFAULT_QUORUM_DENOMINATOR,
        }
    }
}

impl ConfigBounds {
    /// Bound for `field`.
    #[must_use]
    pub fn bound(&self, field: ConfigField) -> Bound {
        match field {
            ConfigField::VotingDelay => self.voting_delay,
            ConfigField::VotingPeriod => self.voting_period,
            ConfigField::ProposalThreshold => self.proposal_threshold,
            ConfigField::QuorumNumerator => self.quorum_numerator,
            ConfigField::LateQuorumExtension => self.late_quorum_extension,
        }
    }

    /// Checks internal consistency of the bounds.
    pub fn validate(&self) -> Result<(), GovernanceError> {
        for field in ALL_FIELDS {
            let bound = self.bound(field);
            if bound.min > bound.max {
                return Err(GovernanceError::InvalidBounds {
                    field,
                    min: bound.min,
                    max: bound.max,
                });
            }
        }
        if self.quorum_denominator == 0 || self.quorum_numerator.max > self.quorum_denominator {
            return Err(GovernanceError::InvalidBounds {
                field: ConfigField::QuorumNumerator,
                min: self.quorum_numerator.min,
                max: self.quorum_numerator.max,
            });
        }
        // A zero-length voting window would make every proposal skip Active.
        if self.voting_period.min == 0 {
            return Err(GovernanceError::InvalidBounds {
                field: ConfigField::VotingPeriod,
                min: 0,
                max: self.voting_period.max,
            });
        }
        Ok(())
    }
}

const ALL_FIELDS: [ConfigField; 5] = [
    ConfigField::VotingDelay,
    ConfigField::VotingPeriod,
    ConfigField::ProposalThreshold,
    ConfigField::QuorumNumerator,
    ConfigField::LateQuorumExtension,
];

/// Current governance parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Delay before the snapshot.
    pub voting_delay: u64,
    /// Voting window length.
    pub voting_period: u64,
    /// Minimum proposer power.
    pub proposal_threshold: Weight,
    /// Quorum numerator over the bounds' denominator.
    pub quorum_numerator: u64,
    /// Late-quorum extension.
    pub late_quorum_extension: u64,
}

impl Default for GovernanceConfig {
    /// One-day delay, one-week period, 4% quorum, one-day extension.
    fn default() -> Self {
        Self {
            voting_delay: 86_400,
            voting_period: 7 * 86_400,
            proposal_threshold: 1,
            quorum_numerator: 4,
            late_quorum_extension: 86_400,
        }
    }
}

impl GovernanceConfig {
    /// Value of `field`.
    #[must_use]
    pub fn get(&self, field: ConfigField) -> u64 {
        match field {
            ConfigField::VotingDelay => self.voting_delay,
            ConfigField::VotingPeriod => self.voting_period,
            ConfigField::ProposalThreshold => self.proposal_threshold,
            ConfigField::QuorumNumerator => self.quorum_numerator,
            ConfigField::LateQuorumExtension => self.late_quorum_extension,
        }
    }

    fn slot(&mut self, field: ConfigField) -> &mut u64 {
        match field {
            ConfigField::VotingDelay => &mut self.voting_delay,
            ConfigField::VotingPeriod => &mut self.voting_period,
            ConfigField::ProposalThreshold => &mut self.proposal_threshold,
            ConfigField::QuorumNumerator => &mut self.quorum_numerator,
            ConfigField::LateQuorumExtension => &mut self.late_quorum_extension,
        }
    }
}

/// Committed parameter change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConfigChange {
    /// Changed parameter.
    pub field: ConfigField,
    /// Previous value.
    pub old: u64,
    /// New value.
    pub new: u64,
}

/// Owner of the bounded configuration.
///
/// Authorization is checked by the caller (the safety gate); this type only
/// enforces bounds and change semantics.
#[derive(Clone, Debug)]
pub struct ConfigStore {
    bounds: ConfigBounds,
    current: GovernanceConfig,
    /// `(effective_from, numerator)`, ascending by timepoint.
    quorum_history: Vec<(Timepoint, u64)>,
}

impl ConfigStore {
    /// Validates bounds and the initial config.
    pub fn new(
        bounds: ConfigBounds,
        initial: GovernanceConfig,
        now: Timepoint,
    ) -> Result<Self, GovernanceError> {
        bounds.validate()?;
        for field in ALL_FIELDS {
            bounds.bound(field).check(field, initial.get(field))?;
        }
        Ok(Self {
            quorum_history: vec![(now, initial.quorum_numerator)],
            bounds,
            current: initial,
        })
    }

    /// Current parameters.
    #[must_use]
    pub fn current(&self) -> &GovernanceConfig {
        &self.current
    }

    /// Configured bounds.
    #[must_use]
    pub fn bounds(&self) -> &ConfigBounds {
        &self.bounds
    }

    /// Quorum denominator.
    #[must_use]
    pub fn quorum_denominator(&self) -> u64 {
        self.bounds.quorum_denominator
    }

    /// Quorum numerator in force at `timepoint`.
    ///
    /// Lookups before the first checkpoint use the initial numerator.
    #[must_use]
    pub fn quorum_numerator_at(&self, timepoint: Timepoint) -> u64 {
        let idx = self
            .quorum_history
            .partition_point(|(from, _)| *from <= timepoint);
        if idx == 0 {
            self.quorum_history[0].1
        } else {
            self.quorum_history[idx - 1].1
        }
    }

    /// True if every current value lies within its bound.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        ALL_FIELDS
            .iter()
            .all(|field| self.bounds.bound(*field).contains(self.current.get(*field)))
    }

    /// Checks a prospective update without committing it.
    pub fn check(&self, field: ConfigField, value: u64) -> Result<(), GovernanceError> {
        self.bounds.bound(field).check(field, value)?;
        if self.current.get(field) == value {
            return Err(GovernanceError::ConfigUnchanged { field, value });
        }
        Ok(())
    }

    /// Validates and commits an update.
    pub fn set(
        &mut self,
        field: ConfigField,
        value: u64,
        now: Timepoint,
    ) -> Result<ConfigChange, GovernanceError> {
        self.check(field, value)?;
        let slot = self.current.slot(field);
        let old = *slot;
        *slot = value;

        if field == ConfigField::QuorumNumerator {
            match self.quorum_history.last_mut() {
                Some(last) if last.0 == now => last.1 = value,
                _ => self.quorum_history.push((now, value)),
            }
        }

        Ok(ConfigChange {
            field,
            old,
            new: value,
        })
    }
}
