//! Provider payload shapes and their conversion into canonical transaction records. One module per gateway
//! provider; the webhook handlers stay thin and delegate the field mapping here.

pub mod casso;
pub mod sepay;
