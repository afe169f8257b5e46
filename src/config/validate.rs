// src/config/validate.rs

use crate::config::model::{
    ClusterSection, EngineSection, FaultSection, RawSweepFile, ScenarioEntry, SweepConfiguration,
    SweepFile,
};
use crate::errors::{Result, SweepError};
use crate::plan::MAX_PARALLELISM;

impl TryFrom<RawSweepFile> for SweepFile {
    type Error = SweepError;

    fn try_from(raw: RawSweepFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_sweep(&raw)?;
        Ok(SweepFile::new_unchecked(raw))
    }
}

fn validate_raw_sweep(raw: &RawSweepFile) -> Result<()> {
    ensure_has_scenarios(&raw.scenario)?;
    validate_sweep_section(&raw.sweep)?;
    validate_engine_section(&raw.engine)?;
    validate_cluster_section(&raw.cluster)?;
    validate_fault_section(&raw.fault)?;
    for (idx, entry) in raw.scenario.iter().enumerate() {
        validate_scenario(idx, entry)?;
    }
    Ok(())
}

fn config_err(msg: impl Into<String>) -> SweepError {
    SweepError::ConfigError(msg.into())
}

fn ensure_has_scenarios(scenarios: &[ScenarioEntry]) -> Result<()> {
    if scenarios.is_empty() {
        return Err(config_err(
            "sweep file must contain at least one [[scenario]] entry",
        ));
    }
    Ok(())
}

fn validate_sweep_section(sweep: &SweepConfiguration) -> Result<()> {
    if sweep.scaled_base_size == 0 {
        return Err(config_err("[sweep].scaled_base_size must be >= 1 (got 0)"));
    }
    if sweep.fixed_base_size == 0 {
        return Err(config_err("[sweep].fixed_base_size must be >= 1 (got 0)"));
    }
    if sweep.shard_count == 0 {
        return Err(config_err("[sweep].shard_count must be >= 1 (got 0)"));
    }
    if sweep.parallelism.is_empty() {
        return Err(config_err("[sweep].parallelism must not be empty"));
    }
    if sweep.parallelism.contains(&0) {
        return Err(config_err(format!(
            "[sweep].parallelism entries must be >= 1 (got {:?})",
            sweep.parallelism
        )));
    }
    if let Some(&n) = sweep.parallelism.iter().find(|&&n| n > MAX_PARALLELISM) {
        return Err(config_err(format!(
            "[sweep].parallelism entries must be <= {MAX_PARALLELISM} (got {n})"
        )));
    }
    if sweep.checkpoint_write_dir == sweep.checkpoint_read_dir {
        return Err(config_err(format!(
            "[sweep].checkpoint_write_dir and checkpoint_read_dir must differ (both {:?})",
            sweep.checkpoint_write_dir
        )));
    }
    Ok(())
}

fn validate_engine_section(engine: &EngineSection) -> Result<()> {
    if engine.launcher.trim().is_empty() {
        return Err(config_err("[engine].launcher must not be empty"));
    }
    if engine.binary.trim().is_empty() {
        return Err(config_err("[engine].binary must not be empty"));
    }
    if engine.runner.trim().is_empty() {
        return Err(config_err("[engine].runner must not be empty"));
    }
    if !(engine.sleep_time.is_finite() && engine.sleep_time >= 0.0) {
        return Err(config_err(format!(
            "[engine].sleep_time must be a non-negative number (got {})",
            engine.sleep_time
        )));
    }
    Ok(())
}

fn validate_cluster_section(cluster: &ClusterSection) -> Result<()> {
    if cluster.hostfile.trim().is_empty() {
        return Err(config_err("[cluster].hostfile must not be empty"));
    }
    if cluster.shell.is_empty() {
        return Err(config_err("[cluster].shell must name a cluster-shell command"));
    }
    Ok(())
}

fn validate_fault_section(fault: &FaultSection) -> Result<()> {
    if !(fault.delay_seconds.is_finite() && fault.delay_seconds >= 0.0) {
        return Err(config_err(format!(
            "[fault].delay_seconds must be a non-negative number (got {})",
            fault.delay_seconds
        )));
    }
    if fault.kill_command.is_empty() {
        return Err(config_err("[fault].kill_command must not be empty"));
    }
    Ok(())
}

fn validate_scenario(idx: usize, entry: &ScenarioEntry) -> Result<()> {
    let kind = entry.kind;

    if entry.graph_size == Some(0) {
        return Err(config_err(format!(
            "scenario #{idx} ({kind}): graph_size must be >= 1 (got 0)"
        )));
    }
    if entry.parallelism == Some(0) {
        return Err(config_err(format!(
            "scenario #{idx} ({kind}): parallelism must be >= 1 (got 0)"
        )));
    }
    if let Some(n) = entry.parallelism.filter(|&n| n > MAX_PARALLELISM) {
        return Err(config_err(format!(
            "scenario #{idx} ({kind}): parallelism must be <= {MAX_PARALLELISM} (got {n})"
        )));
    }

    if kind.is_sweep() {
        if entry.graph_size.is_some() || entry.parallelism.is_some() {
            return Err(config_err(format!(
                "scenario #{idx} ({kind}): graph_size/parallelism are derived from [sweep] \
                 and must not be set"
            )));
        }
    } else {
        if entry.graph_size.is_none() {
            return Err(config_err(format!(
                "scenario #{idx} ({kind}): graph_size is required"
            )));
        }
        if entry.parallelism.is_none() {
            return Err(config_err(format!(
                "scenario #{idx} ({kind}): parallelism is required"
            )));
        }
    }

    if let Some(name) = &entry.log_name {
        if name.trim().is_empty() || name.contains('/') {
            return Err(config_err(format!(
                "scenario #{idx} ({kind}): log_name must be a non-empty file name (got {name:?})"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ScenarioKind;

    fn raw_with(scenario: Vec<ScenarioEntry>) -> RawSweepFile {
        RawSweepFile {
            sweep: SweepConfiguration::default(),
            engine: EngineSection::default(),
            cluster: ClusterSection::default(),
            fault: FaultSection::default(),
            scenario,
        }
    }

    #[test]
    fn defaults_with_one_sweep_scenario_are_valid() {
        let raw = raw_with(vec![ScenarioEntry::new(ScenarioKind::SizeScaling)]);
        assert!(SweepFile::try_from(raw).is_ok());
    }

    #[test]
    fn same_checkpoint_roots_are_rejected() {
        let mut raw = raw_with(vec![ScenarioEntry::new(ScenarioKind::SizeScaling)]);
        raw.sweep.checkpoint_read_dir = raw.sweep.checkpoint_write_dir.clone();
        let err = SweepFile::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("must differ"));
    }

    #[test]
    fn zero_in_parallelism_is_rejected() {
        let mut raw = raw_with(vec![ScenarioEntry::new(ScenarioKind::TimeScaling)]);
        raw.sweep.parallelism = vec![1, 0, 4];
        assert!(matches!(
            SweepFile::try_from(raw),
            Err(SweepError::ConfigError(_))
        ));
    }

    #[test]
    fn parallelism_above_ceiling_is_rejected() {
        let mut raw = raw_with(vec![ScenarioEntry::new(ScenarioKind::TimeScaling)]);
        raw.sweep.parallelism = vec![1, u32::MAX];
        let err = SweepFile::try_from(raw).unwrap_err();
        assert!(err.to_string().contains("must be <="));

        let mut entry = ScenarioEntry::new(ScenarioKind::WorkStealing);
        entry.graph_size = Some(100);
        entry.parallelism = Some(MAX_PARALLELISM + 1);
        assert!(matches!(
            SweepFile::try_from(raw_with(vec![entry])),
            Err(SweepError::ConfigError(_))
        ));
    }

    #[test]
    fn sweeping_scenario_rejects_explicit_graph_size() {
        let mut entry = ScenarioEntry::new(ScenarioKind::SizeScaling);
        entry.graph_size = Some(40);
        let err = SweepFile::try_from(raw_with(vec![entry])).unwrap_err();
        assert!(err.to_string().contains("derived from [sweep]"));
    }

    #[test]
    fn negative_fault_delay_is_rejected() {
        let mut raw = raw_with(vec![ScenarioEntry::new(ScenarioKind::SizeScaling)]);
        raw.fault.delay_seconds = -1.0;
        assert!(SweepFile::try_from(raw).is_err());
    }
}
