mod campaign;
mod lead;

pub use campaign::{Campaign, CampaignStatus};
pub use lead::{AutoLead, NewAutoLead};
