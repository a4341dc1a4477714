mod controller_tests;
mod protocol_tests;
