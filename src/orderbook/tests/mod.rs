#![cfg(test)]

mod modification_tests;
