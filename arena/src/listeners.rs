use std::collections::BTreeMap;

use bulwark::{Event, EventKind, EventListener};

/// Counts kills, per wave and in total
#[derive(Debug, Default)]
pub struct KillTally {
    pub total: usize,
    pub wave: usize,
}

impl EventListener for KillTally {
    fn on_event(&mut self, event: &Event) -> anyhow::Result<()> {
        match event.kind() {
            EventKind::EntityKilled => {
                self.total += 1;
                self.wave += 1;
            }
            EventKind::WaveCleared => {
                tracing::info!(wave = event.number("wave")?, kills = self.wave, "Wave cleared");
                self.wave = 0;
            }
            _ => {}
        }

        Ok(())
    }
}

/// Tracks the currency of the player
#[derive(Debug, Default)]
pub struct Wallet {
    pub balance: f64,
    pub earned: f64,
}

impl EventListener for Wallet {
    fn on_event(&mut self, event: &Event) -> anyhow::Result<()> {
        match event.kind() {
            EventKind::CurrencyEarned => {
                let amount = event.number("amount")?;
                self.balance += amount;
                self.earned += amount;
            }
            EventKind::UpgradePurchased => {
                let cost = event.number("cost")?;
                if cost > self.balance {
                    anyhow::bail!("Purchased an upgrade for {cost} with a balance of {}", self.balance);
                }

                self.balance -= cost;
            }
            _ => {}
        }

        Ok(())
    }
}

/// Logs every event and keeps a count per kind
#[derive(Debug, Default)]
pub struct EventLog {
    pub counts: BTreeMap<EventKind, usize>,
}

impl EventListener for EventLog {
    fn on_event(&mut self, event: &Event) -> anyhow::Result<()> {
        tracing::debug!("{event}");
        *self.counts.entry(event.kind()).or_default() += 1;
        Ok(())
    }
}
