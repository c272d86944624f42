pub mod sourcing;
