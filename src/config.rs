use std::{
    io::{self, BufRead},
    path::{Path, PathBuf},
};

use crate::util;

/// Startup tunables. Anything not set in a config file keeps its default.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub width: u32,
    pub height: u32,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    /// How far one camera move goes when no magnitude is given.
    pub move_step: f32,
    /// How many degrees one camera pan turns when no magnitude is given.
    pub pan_step: f32,
    /// Degrees of pan per pixel of mouse drag.
    pub drag_sensitivity: f32,
    pub sphere_stacks: u32,
    pub sphere_slices: u32,
    pub texture_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            width: 800,
            height: 600,
            fov: 60.0,
            near: 0.1,
            far: 1000.0,
            move_step: 0.2,
            pan_step: 5.0,
            drag_sensitivity: 0.3,
            sphere_stacks: 10,
            sphere_slices: 20,
            texture_dir: PathBuf::from("textures"),
        }
    }
}

impl Config {
    #[inline]
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Read a file of `key = value` lines on top of the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> io::Result<Config> {
        let path = path.as_ref();
        let config = Config::read(util::buf_open(path)?)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse config text. `#` starts a comment and blank lines are skipped. Unknown keys
    /// and bad values fail with the offending line number.
    pub fn read<R: BufRead>(reader: R) -> io::Result<Config> {
        let mut config = Config::default();
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            let line = match line.find('#') {
                Some(comment) => &line[..comment],
                None => &line[..],
            }
            .trim();
            if line.is_empty() {
                continue;
            }

            let number = number + 1;
            let mut parts = line.splitn(2, '=');
            let key = parts.next().unwrap_or_default().trim();
            let value = match parts.next() {
                Some(value) => value.trim(),
                None => {
                    return util::io_err(
                        io::ErrorKind::InvalidData,
                        format!("line {}: expected `key = value`, found `{}`", number, line),
                    )
                }
            };
            let diagnostic = format!("line {}: bad value for `{}`", number, key);

            match key {
                "width" => config.width = util::parse_diagnostic(value, &diagnostic)?,
                "height" => config.height = util::parse_diagnostic(value, &diagnostic)?,
                "fov" => config.fov = util::parse_diagnostic(value, &diagnostic)?,
                "near" => config.near = util::parse_diagnostic(value, &diagnostic)?,
                "far" => config.far = util::parse_diagnostic(value, &diagnostic)?,
                "move_step" => config.move_step = util::parse_diagnostic(value, &diagnostic)?,
                "pan_step" => config.pan_step = util::parse_diagnostic(value, &diagnostic)?,
                "drag_sensitivity" => {
                    config.drag_sensitivity = util::parse_diagnostic(value, &diagnostic)?
                }
                "sphere_stacks" => config.sphere_stacks = util::parse_diagnostic(value, &diagnostic)?,
                "sphere_slices" => config.sphere_slices = util::parse_diagnostic(value, &diagnostic)?,
                "texture_dir" => config.texture_dir = PathBuf::from(value),
                _ => {
                    return util::io_err(
                        io::ErrorKind::InvalidData,
                        format!("line {}: unknown config key `{}`", number, key),
                    )
                }
            }
        }
        Ok(config)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn empty_file_is_default() {
        let config = Config::read(Cursor::new("\n# nothing here\n\n")).unwrap();
        assert_eq!(Config::default(), config);
        assert!((config.aspect_ratio() - 800.0 / 600.0).abs() < 1e-6);
    }

    #[test]
    fn reads_values() {
        let text = "
            width = 1024   # wider
            height=768
            fov = 45.5
            texture_dir = assets/textures
            sphere_slices = 32
        ";
        let config = Config::read(Cursor::new(text)).unwrap();
        assert_eq!(1024, config.width);
        assert_eq!(768, config.height);
        assert_eq!(45.5, config.fov);
        assert_eq!(32, config.sphere_slices);
        assert_eq!(10, config.sphere_stacks);
        assert_eq!(PathBuf::from("assets/textures"), config.texture_dir);
    }

    #[test]
    fn rejects_bad_lines() {
        let err = Config::read(Cursor::new("width = 10\nspeed = 3")).unwrap_err();
        assert_eq!(io::ErrorKind::InvalidData, err.kind());
        assert!(err.to_string().contains("line 2"));

        let err = Config::read(Cursor::new("fov = wide")).unwrap_err();
        assert!(err.to_string().starts_with("line 1: bad value for `fov`"));

        assert!(Config::read(Cursor::new("just words")).is_err());
    }

    #[test]
    fn missing_file() {
        assert!(Config::load("/definitely/not/here/henhouse.cfg").is_err());
    }
}
