pub mod buddies;
