//! MySQL family grammar, also serving MariaDB.

use crate::parser::ast::BinaryOp;
use crate::parser::DialectGrammar;
use crate::ParserFeatures;

/// MySQL reads `||` as logical OR unless
/// [`ParserFeatures::PIPES_AS_CONCAT`] puts it back to concatenation.
pub(crate) struct MysqlGrammar;

impl DialectGrammar for MysqlGrammar {
    fn pipes_operator(&self, features: ParserFeatures) -> BinaryOp {
        if features.contains(ParserFeatures::PIPES_AS_CONCAT) {
            BinaryOp::Concat
        } else {
            BinaryOp::Or
        }
    }
}
