mod integration;
mod property;
