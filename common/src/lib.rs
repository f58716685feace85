pub mod obs;
