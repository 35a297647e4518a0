//! Utility functions wrapping the standard library's filesystem operations,
//! attaching the offending path to every error.

use crate::error::LangsError;
use std::{
    fs::{self, File},
    io::{Read, Write},
    path::Path,
};

pub fn open_file<P: AsRef<Path>>(path: P) -> Result<File, LangsError> {
    let path = path.as_ref();
    File::open(path).map_err(|e| LangsError::OpenFile(path.to_path_buf(), e))
}

pub fn read_file<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, LangsError> {
    let path = path.as_ref();
    let mut file = open_file(path)?;
    let mut bytes = vec![];
    file.read_to_end(&mut bytes)
        .map_err(|e| LangsError::ReadFile(path.to_path_buf(), e))?;
    Ok(bytes)
}

pub fn read_file_to_string<P: AsRef<Path>>(path: P) -> Result<String, LangsError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| LangsError::ReadFile(path.to_path_buf(), e))
}

/// Creates the file and any missing parent directories.
pub fn create_file<P: AsRef<Path>>(path: P) -> Result<File, LangsError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            create_dir_all(parent)?;
        }
    }
    File::create(path).map_err(|e| LangsError::CreateFile(path.to_path_buf(), e))
}

pub fn write_to_file<S: AsRef<[u8]>, P: AsRef<Path>>(
    source: S,
    target: P,
) -> Result<(), LangsError> {
    let target = target.as_ref();
    let mut target_file = create_file(target)?;
    target_file
        .write_all(source.as_ref())
        .map_err(|e| LangsError::WriteFile(target.to_path_buf(), e))?;
    Ok(())
}

/// Reads all of the data from source and writes it into a new file at target.
pub fn read_to_file<R: Read, P: AsRef<Path>>(source: &mut R, target: P) -> Result<(), LangsError> {
    let target = target.as_ref();
    let mut target_file = create_file(target)?;
    std::io::copy(source, &mut target_file)
        .map_err(|e| LangsError::WriteFile(target.to_path_buf(), e))?;
    Ok(())
}

pub fn create_dir_all<P: AsRef<Path>>(path: P) -> Result<(), LangsError> {
    fs::create_dir_all(&path).map_err(|e| LangsError::CreateDir(path.as_ref().to_path_buf(), e))
}

/// Copies the file at source to the target path, creating missing parent directories.
pub fn copy<P: AsRef<Path>, Q: AsRef<Path>>(source: P, target: Q) -> Result<(), LangsError> {
    let source = source.as_ref();
    let target = target.as_ref();
    if let Some(parent) = target.parent() {
        if !parent.exists() {
            create_dir_all(parent)?;
        }
    }
    fs::copy(source, target)
        .map_err(|e| LangsError::CopyFile(source.to_path_buf(), target.to_path_buf(), e))?;
    Ok(())
}
