//! Reading and writing ROAs from and to files.
//!
//! ROAs can be stored in three formats: plain DER, DER armored as text, and
//! the configuration format used to create new ROAs. The latter can only be
//! read.

use std::{fmt, fs, io};
use std::io::Write;
use std::path::Path;
use std::str::FromStr;
use log::{debug, info};
use crate::armor;
use crate::builder::RoaBuilder;
use crate::crypto::{KeyFileSigner, RoaSigner};
use crate::error::RoaError;
use crate::roa::RoaObject;
use crate::validate::{BasicValidator, RoaValidator};


/// The permissions of files created by [`store`].
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;


//------------ Format --------------------------------------------------------

/// The file formats for ROAs.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
    /// The DER encoded signed object.
    Der,

    /// The DER encoding armored with the label `ROA`.
    Pem,

    /// A configuration file with directives for the builder.
    Conf,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Der => "der",
            Format::Pem => "pem",
            Format::Conf => "conf",
        }
    }
}

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "der" => Ok(Format::Der),
            "pem" => Ok(Format::Pem),
            "conf" | "cnf" => Ok(Format::Conf),
            _ => Err(UnknownFormat)
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


//------------ Loading -------------------------------------------------------

/// Loads a ROA from a file.
///
/// Configuration files are built into a ROA and signed with a
/// [`KeyFileSigner`]. If `validate` is `true`, the loaded object is checked
/// by a [`BasicValidator`].
pub fn load(
    path: impl AsRef<Path>, format: Format, validate: bool
) -> Result<RoaObject, RoaError> {
    let validator = BasicValidator::new();
    load_with(
        path, format,
        if validate { Some(&validator) } else { None },
        KeyFileSigner::new()
    )
}

/// Loads a ROA from a file with the given validator and signer.
///
/// The signer is only used for configuration files.
pub fn load_with<V: RoaValidator, S: RoaSigner>(
    path: impl AsRef<Path>,
    format: Format,
    validator: Option<&V>,
    signer: S,
) -> Result<RoaObject, RoaError> {
    let path = path.as_ref();
    debug!("loading {} file {}", format, path.display());
    let data = fs::read(path)?;
    let roa = match format {
        Format::Der => der_stage(&data)?,
        Format::Pem => der_stage(&pem_stage(data)?)?,
        Format::Conf => RoaBuilder::build_from_conf(&data, signer)?,
    };
    if let Some(validator) = validator {
        validator.validate(&roa)?;
        debug!("{} passed validation", path.display());
    }
    Ok(roa)
}

/// Removes the armor.
///
/// Takes the data by value so the armored text is dropped once decoded.
fn pem_stage(data: Vec<u8>) -> Result<Vec<u8>, RoaError> {
    armor::decode(&data, armor::ROA_LABEL)
}

fn der_stage(data: &[u8]) -> Result<RoaObject, RoaError> {
    RoaObject::decode_exact(data)
}


//------------ Storing -------------------------------------------------------

/// Stores a ROA in a file.
///
/// An existing file is replaced. Storing in the configuration format is not
/// supported and silently does nothing.
pub fn store(
    roa: &RoaObject, path: impl AsRef<Path>, format: Format
) -> Result<(), RoaError> {
    let path = path.as_ref();
    let data = match format {
        Format::Der => roa.to_der()?.to_vec(),
        Format::Pem => {
            armor::encode(roa.to_der()?.as_ref(), armor::ROA_LINE_LEN)?
        }
        Format::Conf => {
            debug!("not storing {} as configuration", path.display());
            return Ok(())
        }
    };
    match fs::remove_file(path) {
        Ok(()) => { }
        Err(ref err) if err.kind() == io::ErrorKind::NotFound => { }
        Err(err) => return Err(err.into())
    }
    let mut file = open_new(path)?;
    file.write_all(&data)?;
    info!("stored ROA as {} in {}", format, path.display());
    Ok(())
}

#[cfg(unix)]
fn open_new(path: &Path) -> Result<fs::File, io::Error> {
    use std::os::unix::fs::OpenOptionsExt;

    fs::OpenOptions::new()
        .create_new(true)
        .write(true)
        .mode(FILE_MODE)
        .open(path)
}

#[cfg(not(unix))]
fn open_new(path: &Path) -> Result<fs::File, io::Error> {
    fs::OpenOptions::new().create_new(true).write(true).open(path)
}


//------------ UnknownFormat -------------------------------------------------

/// A format name was not recognized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownFormat;

impl fmt::Display for UnknownFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("unknown format, expected one of der, pem, conf")
    }
}

impl std::error::Error for UnknownFormat { }


//============ Tests =========================================================
