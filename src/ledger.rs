/// Running coin balance earned from challenges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoinLedger {
    balance: u32,
}

impl CoinLedger {
    pub fn with_balance(balance: u32) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> u32 {
        self.balance
    }

    /// Adds `amount` and returns the new balance. Saturates instead of
    /// wrapping.
    pub fn add_coin(&mut self, amount: u32) -> u32 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::CHALLENGE_REWARD;

    #[test]
    fn three_rewards_add_up() {
        let mut ledger = CoinLedger::default();
        let balances: Vec<u32> = (0..3).map(|_| ledger.add_coin(CHALLENGE_REWARD)).collect();

        assert_eq!(balances, vec![5, 10, 15]);
        assert_eq!(ledger.balance(), 15);
    }

    #[test]
    fn balance_saturates() {
        let mut ledger = CoinLedger::with_balance(u32::MAX - 1);
        assert_eq!(ledger.add_coin(5), u32::MAX);
    }
}
