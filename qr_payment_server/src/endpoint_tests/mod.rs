mod casso;
mod helpers;
mod sepay;
