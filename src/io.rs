//! Utilities for input/output.

use crate::{Result, Sim2Error};
use log::debug;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs::{self, File},
    io::{self, BufReader, Read, Write},
    path::Path,
};

/// Creates any directories missing in order for the given path to be valid.
pub fn create_directory_if_missing(path: impl AsRef<Path>) -> io::Result<()> {
    let path = path.as_ref();
    if path.extension().is_some() {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
        } else {
            Ok(())
        }
    } else {
        fs::create_dir_all(path)
    }
}

/// Creates the file at the given path, as well as any missing parent
/// directories.
pub fn create_file_and_required_directories(file_path: impl AsRef<Path>) -> io::Result<File> {
    create_directory_if_missing(&file_path)?;
    File::create(file_path)
}

/// Reads and returns the content of the specified text file.
pub fn read_text_file(file_path: impl AsRef<Path>) -> io::Result<String> {
    let file = File::open(file_path)?;
    let mut text = String::new();
    let _ = BufReader::new(file).read_to_string(&mut text)?;
    Ok(text)
}

/// Writes the given string as a text file with the specified path, regardless
/// of whether the file already exists.
pub fn write_text_file(text: &str, output_file_path: impl AsRef<Path>) -> io::Result<()> {
    let mut file = create_file_and_required_directories(output_file_path)?;
    write!(&mut file, "{text}")
}

/// Reads the JSON file at the given path and deserializes the contents into
/// an object of type `T`.
pub fn parse_json_file<T>(file_path: impl AsRef<Path>) -> Result<T>
where
    T: DeserializeOwned,
{
    let file_path = file_path.as_ref();

    let text = read_text_file(file_path).map_err(|source| Sim2Error::FileReading {
        path: file_path.to_path_buf(),
        source,
    })?;

    let value = serde_json::from_str(&text).map_err(|source| Sim2Error::JsonParsing {
        path: file_path.to_path_buf(),
        source,
    })?;

    debug!("Parsed JSON file {}", file_path.display());

    Ok(value)
}

/// Serializes the given value of type `T` to JSON and writes it to the given
/// path.
pub fn write_json_file<T>(value: &T, output_file_path: impl AsRef<Path>) -> Result<()>
where
    T: Serialize,
{
    let output_file_path = output_file_path.as_ref();

    let text = serde_json::to_string_pretty(value)
        .map_err(|source| Sim2Error::JsonSerialization { source })?;

    write_text_file(&text, output_file_path).map_err(|source| Sim2Error::FileWriting {
        path: output_file_path.to_path_buf(),
        source,
    })?;

    debug!("Wrote JSON file {}", output_file_path.display());

    Ok(())
}
