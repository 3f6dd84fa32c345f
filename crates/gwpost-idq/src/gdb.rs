//! Invocations of the GraceDB helper executables.
//!
//! The helpers (`idq-gdb-timeseries`, `idq-gdb-glitch-tables`) are opaque
//! collaborators: a request is turned into a command line, the process runs
//! to completion, and its exit status is handed back uninterpreted.

use std::{
    ffi::{OsStr, OsString},
    fmt, io,
    num::ParseFloatError,
    path::{Path, PathBuf},
    process::{Command, ExitStatus},
    str::FromStr,
};

use crate::config::{ConfigError, IdqConfig};

/// Config section forwarded to `idq-gdb-timeseries`.
pub const TIMESERIES_SECTION: &str = "gdb-time-series";
/// Config section forwarded to `idq-gdb-glitch-tables`.
pub const GLITCH_TABLES_SECTION: &str = "gdb-glitch-tables";

#[derive(Debug, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum GdbError {
    #[display("Invalid iDQ configuration")]
    #[from]
    Config(ConfigError),
    #[display("Failed to run {}", program.display())]
    Spawn {
        program: PathBuf,
        source: io::Error,
    },
}

/// A program and its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: PathBuf,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new<P>(program: P) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg<S>(&mut self, arg: S) -> &mut Self
    where
        S: AsRef<OsStr>,
    {
        self.args.push(arg.as_ref().to_owned());
        self
    }

    /// Appends `name value`.
    pub fn option<S>(&mut self, name: &str, value: S) -> &mut Self
    where
        S: AsRef<OsStr>,
    {
        self.arg(name).arg(value)
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Runs the command to completion with inherited standard streams.
    pub fn execute(&self, process_name: &str) -> Result<ExitStatus, GdbError> {
        log::info!("Running {process_name}: {self}");
        let status = Command::new(&self.program)
            .args(&self.args)
            .status()
            .map_err(|source| GdbError::Spawn {
                program: self.program.clone(),
                source,
            })?;
        log::info!("{process_name} finished with {status}");
        Ok(status)
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// A GPS time checked to be a number but kept as the text it was given in.
///
/// ```
/// use gwpost_idq::gdb::GpsArgument;
///
/// let gps = "1126259462.000".parse::<GpsArgument>().unwrap();
/// assert_eq!(gps.seconds(), 1_126_259_462.0);
/// assert_eq!(gps.to_string(), "1126259462.000");
/// assert!("soon".parse::<GpsArgument>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GpsArgument {
    text: String,
    seconds: f64,
}

impl GpsArgument {
    #[must_use]
    pub fn seconds(&self) -> f64 {
        self.seconds
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }
}

impl FromStr for GpsArgument {
    type Err = ParseFloatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self {
            text: s.to_owned(),
            seconds: s.parse()?,
        })
    }
}

impl fmt::Display for GpsArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl AsRef<OsStr> for GpsArgument {
    fn as_ref(&self) -> &OsStr {
        OsStr::new(&self.text)
    }
}

/// Arguments shared by both helpers.
#[derive(Debug, Clone, PartialEq)]
pub struct GdbTask {
    pub gps_start: GpsArgument,
    pub gps_end: GpsArgument,
    pub gracedb_id: String,
    pub ifo: String,
    pub classifier: String,
    pub input_dir: PathBuf,
    pub usertag: String,
}

impl GdbTask {
    fn append_identity(&self, command: &mut CommandLine) {
        command
            .option("--ifo", &self.ifo)
            .option("-c", &self.classifier)
            .option("-i", &self.input_dir)
            .option("-t", &self.usertag);
    }
}

fn append_config(
    command: &mut CommandLine,
    config: &IdqConfig,
    section: &str,
) -> Result<(), ConfigError> {
    for (option, value) in config.section_items(section)? {
        command.arg(option).arg(value);
    }
    Ok(())
}

/// Request for `idq-gdb-timeseries`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeseriesRequest {
    pub task: GdbTask,
    pub gps: GpsArgument,
    pub gch_xml: Vec<PathBuf>,
    pub cln_xml: Vec<PathBuf>,
    pub plotting_gps_start: Option<GpsArgument>,
    pub plotting_gps_end: Option<GpsArgument>,
}

impl TimeseriesRequest {
    /// Builds the command line; options of `[gdb-time-series]` come last.
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use gwpost_idq::{config::IdqConfig, gdb::{GdbTask, TimeseriesRequest}};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    ///
    /// let config = "[gdb-time-series]\n\"--verbose\" = \"\"\n".parse::<IdqConfig>().unwrap();
    /// let request = TimeseriesRequest {
    ///     task: GdbTask {
    ///         gps_start: "100".parse()?,
    ///         gps_end: "200.0".parse()?,
    ///         gracedb_id: "G1234".into(),
    ///         ifo: "L1".into(),
    ///         classifier: "ovl".into(),
    ///         input_dir: PathBuf::from("/data"),
    ///         usertag: String::new(),
    ///     },
    ///     gps: "150.5".parse()?,
    ///     gch_xml: vec![],
    ///     cln_xml: vec![],
    ///     plotting_gps_start: None,
    ///     plotting_gps_end: None,
    /// };
    /// let command = request.command_line("idq-gdb-timeseries", &config)?;
    /// assert_eq!(
    ///     command.to_string(),
    ///     "idq-gdb-timeseries -s 100 -e 200.0 --gps 150.5 -g G1234 --ifo L1 -c ovl -i /data -t  --verbose ",
    /// );
    /// # Ok(())
    /// # }
    /// ```
    pub fn command_line<P>(
        &self,
        executable: P,
        config: &IdqConfig,
    ) -> Result<CommandLine, ConfigError>
    where
        P: Into<PathBuf>,
    {
        let task = &self.task;
        let mut command = CommandLine::new(executable);
        command
            .option("-s", &task.gps_start)
            .option("-e", &task.gps_end)
            .option("--gps", &self.gps)
            .option("-g", &task.gracedb_id);
        task.append_identity(&mut command);

        if let Some(url) = config.gdb_url()? {
            command.option("--gdb-url", url);
        }
        if let Some(start) = &self.plotting_gps_start {
            command.option("--plotting-gps-start", start);
        }
        if let Some(end) = &self.plotting_gps_end {
            command.option("--plotting-gps-end", end);
        }
        for gch in &self.gch_xml {
            command.option("--gch-xml", gch);
        }
        for cln in &self.cln_xml {
            command.option("--cln-xml", cln);
        }
        append_config(&mut command, config, TIMESERIES_SECTION)?;
        Ok(command)
    }

    /// Builds and runs the command, returning the helper's exit status.
    pub fn execute<P>(&self, executable: P, config: &IdqConfig) -> Result<ExitStatus, GdbError>
    where
        P: Into<PathBuf>,
    {
        self.command_line(executable, config)?
            .execute("gdb_timeseries")
    }
}

/// Request for `idq-gdb-glitch-tables`.
#[derive(Debug, Clone, PartialEq)]
pub struct GlitchTablesRequest {
    pub task: GdbTask,
}

impl GlitchTablesRequest {
    /// Builds the command line; options of `[gdb-glitch-tables]` come last.
    pub fn command_line<P>(
        &self,
        executable: P,
        config: &IdqConfig,
    ) -> Result<CommandLine, ConfigError>
    where
        P: Into<PathBuf>,
    {
        let task = &self.task;
        let mut command = CommandLine::new(executable);
        command
            .option("-s", &task.gps_start)
            .option("-e", &task.gps_end)
            .option("-g", &task.gracedb_id);
        task.append_identity(&mut command);

        if let Some(url) = config.gdb_url()? {
            command.option("--gdb-url", url);
        }
        append_config(&mut command, config, GLITCH_TABLES_SECTION)?;
        Ok(command)
    }

    /// Builds and runs the command, returning the helper's exit status.
    pub fn execute<P>(&self, executable: P, config: &IdqConfig) -> Result<ExitStatus, GdbError>
    where
        P: Into<PathBuf>,
    {
        self.command_line(executable, config)?
            .execute("gdb_glitch_tables")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gps(text: &str) -> GpsArgument {
        text.parse().unwrap()
    }

    fn task() -> GdbTask {
        GdbTask {
            gps_start: gps("1126259000"),
            gps_end: gps("1126260000"),
            gracedb_id: "G184098".into(),
            ifo: "H1".into(),
            classifier: "mvsc".into(),
            input_dir: PathBuf::from("/home/idq/realtime"),
            usertag: "_test".into(),
        }
    }

    fn config() -> IdqConfig {
        r#"
[general]
gdb_url = "https://gracedb.example.org/api/"

[gdb-time-series]
"--verbose" = ""
"--window" = 16

[gdb-glitch-tables]
"--skip-upload" = true
"#
        .parse()
        .unwrap()
    }

    fn strings(command: &CommandLine) -> Vec<String> {
        command
            .args()
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_timeseries_argument_order() {
        let request = TimeseriesRequest {
            task: task(),
            gps: gps("1126259462.42"),
            gch_xml: vec!["gch1.xml".into(), "gch2.xml".into()],
            cln_xml: vec!["cln.xml".into()],
            plotting_gps_start: Some(gps("1126259400")),
            plotting_gps_end: Some(gps("1126259500")),
        };
        let command = request
            .command_line("/usr/bin/idq-gdb-timeseries", &config())
            .unwrap();
        assert_eq!(command.program(), Path::new("/usr/bin/idq-gdb-timeseries"));
        assert_eq!(
            strings(&command),
            [
                "-s",
                "1126259000",
                "-e",
                "1126260000",
                "--gps",
                "1126259462.42",
                "-g",
                "G184098",
                "--ifo",
                "H1",
                "-c",
                "mvsc",
                "-i",
                "/home/idq/realtime",
                "-t",
                "_test",
                "--gdb-url",
                "https://gracedb.example.org/api/",
                "--plotting-gps-start",
                "1126259400",
                "--plotting-gps-end",
                "1126259500",
                "--gch-xml",
                "gch1.xml",
                "--gch-xml",
                "gch2.xml",
                "--cln-xml",
                "cln.xml",
                "--verbose",
                "",
                "--window",
                "16",
            ]
        );
    }

    #[test]
    fn test_gps_text_is_forwarded_unchanged() {
        let mut task = task();
        task.gps_start = gps("100.000");
        task.gps_end = gps("2e2");
        let request = TimeseriesRequest {
            task,
            gps: gps("150.50"),
            gch_xml: vec![],
            cln_xml: vec![],
            plotting_gps_start: Some(gps("140.0")),
            plotting_gps_end: None,
        };
        let args = strings(&request.command_line("idq-gdb-timeseries", &config()).unwrap());
        assert_eq!(&args[..6], ["-s", "100.000", "-e", "2e2", "--gps", "150.50"]);
        assert!(args.windows(2).any(|w| w == ["--plotting-gps-start", "140.0"]));
        assert_eq!(request.gps.seconds(), 150.5);
        assert_eq!(request.task.gps_end.seconds(), 200.0);
    }

    #[test]
    fn test_gps_must_be_numeric() {
        assert!("".parse::<GpsArgument>().is_err());
        assert!("1126259462s".parse::<GpsArgument>().is_err());
        assert_eq!(gps("-1.5").as_str(), "-1.5");
    }

    #[test]
    fn test_glitch_tables_arguments() {
        let request = GlitchTablesRequest { task: task() };
        let command = request
            .command_line("idq-gdb-glitch-tables", &config())
            .unwrap();
        let args = strings(&command);
        assert_eq!(&args[..6], ["-s", "1126259000", "-e", "1126260000", "-g", "G184098"]);
        assert_eq!(
            &args[args.len() - 4..],
            ["--gdb-url", "https://gracedb.example.org/api/", "--skip-upload", "true"]
        );
        assert!(!args.contains(&"--gps".to_owned()));
    }

    #[test]
    fn test_missing_section() {
        let request = GlitchTablesRequest { task: task() };
        let config = IdqConfig::default();
        assert!(matches!(
            request.command_line("idq-gdb-glitch-tables", &config),
            Err(ConfigError::MissingSection { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_exit_status_is_returned() {
        let mut command = CommandLine::new("sh");
        command.arg("-c").arg("exit 3");
        let status = command.execute("test").unwrap();
        assert_eq!(status.code(), Some(3));

        let missing = CommandLine::new("/nonexistent/idq-gdb-timeseries");
        assert!(matches!(
            missing.execute("test"),
            Err(GdbError::Spawn { .. })
        ));
    }
}
