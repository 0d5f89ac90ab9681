use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Logical datasets shipped with the BanVic extract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DatasetName {
    Agencias,
    Clientes,
    ColabAgencia,
    Colaboradores,
    Contas,
    PropostaCredito,
    Transacoes,
}

impl DatasetName {
    pub const ALL: [DatasetName; 7] = [
        DatasetName::Agencias,
        DatasetName::Clientes,
        DatasetName::ColabAgencia,
        DatasetName::Colaboradores,
        DatasetName::Contas,
        DatasetName::PropostaCredito,
        DatasetName::Transacoes,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetName::Agencias => "AGENCIAS",
            DatasetName::Clientes => "CLIENTES",
            DatasetName::ColabAgencia => "COLAB_AGENCIA",
            DatasetName::Colaboradores => "COLABORADORES",
            DatasetName::Contas => "CONTAS",
            DatasetName::PropostaCredito => "PROPOSTA_CREDITO",
            DatasetName::Transacoes => "TRANSACOES",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            DatasetName::Agencias => "agencias.csv",
            DatasetName::Clientes => "clientes.csv",
            DatasetName::ColabAgencia => "colaborador_agencia.csv",
            DatasetName::Colaboradores => "colaboradores.csv",
            DatasetName::Contas => "contas.csv",
            DatasetName::PropostaCredito => "propostas_credito.csv",
            DatasetName::Transacoes => "transacoes.csv",
        }
    }
}

impl fmt::Display for DatasetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps every dataset to its CSV under `data_dir`. Touches no files.
pub fn dataset_paths(data_dir: &Path) -> BTreeMap<DatasetName, PathBuf> {
    DatasetName::ALL
        .iter()
        .map(|name| (*name, data_dir.join(name.file_name())))
        .collect()
}
