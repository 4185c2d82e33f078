//! Table/session configuration. A plain struct, constructed either
//! programmatically or normalized out of a loaded script file.

use crate::gameplay::rules::RaiseStyle;
use crate::money::Cents;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    pub small_blind: Cents,
    pub big_blind: Cents,
    /// Which raise-amount menu `valid_actions` offers. Set once per table
    /// and echoed into every log record so replay tooling can tell which
    /// menu a recorded raise was chosen from (§9's open question).
    pub raise_style: RaiseStyle,
}

impl TableConfig {
    pub fn new(small_blind: Cents, big_blind: Cents) -> TableConfig {
        TableConfig {
            small_blind,
            big_blind,
            raise_style: RaiseStyle::DiscreteButtons,
        }
    }

    pub fn with_raise_style(mut self, style: RaiseStyle) -> TableConfig {
        self.raise_style = style;
        self
    }
}
