use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use tokio::sync::Mutex;
use tracing::{debug, warn};

use super::domain::{PartnerId, SectionId, SectionStatus, SectionStatusUpdate};
use super::gateway::{GatewayError, PartnerGateway};

/// Per-section review status with optimistic, serialized toggles.
///
/// Each section owns a FIFO turn lock. A toggle holds its section's turn from
/// the optimistic write until the PATCH settles, so a later toggle always
/// starts from a settled value and a rollback can only restore the value its
/// own toggle replaced. Sections never wait on each other.
pub struct SectionStatusBoard {
    current: RwLock<BTreeMap<SectionId, SectionStatus>>,
    turns: [Mutex<()>; 5],
}

/// A toggle whose PATCH failed; local state is already rolled back.
#[derive(Debug)]
pub struct RolledBack {
    pub restored: SectionStatus,
    pub attempted: SectionStatus,
    pub source: GatewayError,
}

impl SectionStatusBoard {
    /// Sections missing from `initial` start out pending.
    pub fn new(initial: &BTreeMap<SectionId, SectionStatus>) -> Self {
        let current = SectionId::ALL
            .into_iter()
            .map(|section| (section, initial.get(&section).copied().unwrap_or_default()))
            .collect();
        Self {
            current: RwLock::new(current),
            turns: Default::default(),
        }
    }

    pub fn get(&self, section: SectionId) -> SectionStatus {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&section)
            .copied()
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> BTreeMap<SectionId, SectionStatus> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, section: SectionId, status: SectionStatus) {
        self.current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(section, status);
    }

    pub async fn toggle<G>(
        &self,
        gateway: &G,
        partner: &PartnerId,
        section: SectionId,
        requested: SectionStatus,
    ) -> Result<SectionStatus, RolledBack>
    where
        G: PartnerGateway + ?Sized,
    {
        let _turn = self.turns[section as usize].lock().await;

        let previous = self.get(section);
        let next = previous.toggled(requested);
        self.set(section, next);
        debug!(%section, %previous, %next, "applied optimistic section status");

        let update = SectionStatusUpdate::new(section, next);
        match gateway.update_section_status(partner, &update).await {
            Ok(()) => Ok(next),
            Err(source) => {
                self.set(section, previous);
                warn!(%section, %previous, attempted = %next, error = %source, "section status rolled back");
                Err(RolledBack {
                    restored: previous,
                    attempted: next,
                    source,
                })
            }
        }
    }
}
