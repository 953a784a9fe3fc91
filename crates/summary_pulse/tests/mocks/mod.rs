#![allow(dead_code)]

pub mod datastore;
pub mod observer;
pub mod summarizer;
pub mod transcriber;
