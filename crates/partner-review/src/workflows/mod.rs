pub mod channel_partner;
