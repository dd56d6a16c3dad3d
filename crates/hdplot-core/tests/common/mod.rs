#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const DROPPED: [&str; 15] = [
    "rmsd_all",
    "rmsd_Emin",
    "Einter",
    "Enb",
    "Evdw+0.1Eelec",
    "Ecdih",
    "Ecoup",
    "Esani",
    "Evean",
    "Edani",
    "#NOEviol",
    "#Dihedviol",
    "#Coupviol",
    "#Veanviol",
    "#Daniviol",
];

/// One pose of a fixture cluster.
#[derive(Debug, Clone)]
pub struct Pose {
    pub name: String,
    pub evdw: f64,
    pub eelec: f64,
    pub bsa: f64,
    pub eair: f64,
    pub edesolv: f64,
}

impl Pose {
    pub fn new(name: &str, seed: f64) -> Self {
        Self {
            name: name.to_string(),
            evdw: -30.0 - seed,
            eelec: -150.0 + 3.0 * seed,
            bsa: 1200.0 + 10.0 * seed,
            eair: 40.0 + seed,
            edesolv: -5.0 + 0.5 * seed,
        }
    }

    pub fn expected_score(&self) -> f64 {
        1.0 * self.evdw + 0.2 * self.eelec + 1.0 * self.edesolv + 0.1 * self.eair
    }
}

/// Builder for a HADDOCK-like docking root on disk.
pub struct RunFixture {
    root: PathBuf,
    models: usize,
    clusters: Vec<(String, Vec<Pose>)>,
    extra_members: Vec<(String, usize)>,
}

impl RunFixture {
    pub fn new(root: impl Into<PathBuf>, models: usize) -> Self {
        Self {
            root: root.into(),
            models,
            clusters: Vec::new(),
            extra_members: Vec::new(),
        }
    }

    /// A cluster whose population equals its pose count.
    pub fn cluster(mut self, id: &str, poses: usize) -> Self {
        let poses = (0..poses)
            .map(|i| Pose::new(&format!("{id}_complex_{i}w.pdb"), i as f64))
            .collect();
        self.clusters.push((id.to_string(), poses));
        self
    }

    /// A cluster listed with `population` members but without statistics files.
    pub fn listed_only(mut self, id: &str, population: usize) -> Self {
        self.extra_members.push((id.to_string(), population));
        self
    }

    pub fn water(&self) -> PathBuf {
        self.root.join("structures").join("it1").join("water")
    }

    pub fn poses(&self, id: &str) -> &[Pose] {
        self.clusters
            .iter()
            .find(|(c, _)| c == id)
            .map(|(_, p)| p.as_slice())
            .unwrap_or(&[])
    }

    pub fn write(self) -> Self {
        let water = self.water();
        fs::create_dir_all(&water).unwrap();
        for i in 0..self.models {
            fs::write(water.join(format!("complex_{i}w.pdb")), "ATOM\n").unwrap();
        }

        let mut list = String::from("#Cluster RMSD list\n");
        for (id, poses) in &self.clusters {
            list.push_str(&format!("{id} 0.9 {}\n", poses.len()));
            write_members(&water, id, poses.len());
            write_stat(&water, id, poses);
            write_desolvation(&water, id, poses);
        }
        for (id, population) in &self.extra_members {
            list.push_str(&format!("{id} 2.0 {population}\n"));
            write_members(&water, id, *population);
        }
        fs::write(water.join("cluster_rmsd.txt"), list).unwrap();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn write_members(water: &Path, id: &str, population: usize) {
    let members: String = (0..population)
        .map(|i| format!("complex_{i}w.pdb\n"))
        .collect();
    fs::write(water.join(id), members).unwrap();
}

fn write_stat(water: &Path, id: &str, poses: &[Pose]) {
    let mut text = format!("#Structure Evdw Eelec BSA Eair {}\n", DROPPED.join(" "));
    for pose in poses {
        let zeros = vec!["0"; DROPPED.len()].join(" ");
        text.push_str(&format!(
            "{} {} {} {} {} {}\n",
            pose.name, pose.evdw, pose.eelec, pose.bsa, pose.eair, zeros
        ));
    }
    fs::write(water.join(format!("{id}.stat")), text).unwrap();
}

fn write_desolvation(water: &Path, id: &str, poses: &[Pose]) {
    let mut text = String::from("#struc Edesolv\n");
    for pose in poses.iter().rev() {
        text.push_str(&format!("{} {}\n", pose.name, pose.edesolv));
    }
    fs::write(water.join(format!("{id}_Edesolv")), text).unwrap();
}
