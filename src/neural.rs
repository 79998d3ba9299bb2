//! Evaluation of single genes as nodes of a computational graph.
//!
//! A forward pass returns the output together with an explicit context holding its intermediate
//! values. The matching backward pass consumes that context, so any number of evaluations of the
//! same gene may be in flight at once.

use std::fmt::Debug;

use log::trace;
use thiserror::Error;

use crate::activation::ActivationFunction;
use crate::aggregation::AggregationFunction;
use crate::config::FunctionRegistries;
use crate::gene::{Attributed, DefaultConnectionGene, DefaultNodeGene};


/// Error that may occur during a forward pass.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EvaluationError {
    #[error("no activation function registered under `{0}`")]
    UnknownActivation(String),

    #[error("no aggregation function registered under `{0}`")]
    UnknownAggregation(String),

    #[error("expected {expected} inputs, got {actual}")]
    Arity { expected: usize, actual: usize },
}


/// Genes that can be evaluated and differentiated.
pub trait Differentiable {
    /// Intermediate values of one forward pass.
    type Context: Clone + Debug;

    /// Partial derivatives of the output w.r.t. the inputs and the trainable attributes.
    type Gradient: Clone + Debug;

    /// Computes the output of the gene for `inputs`.
    ///
    /// # Arguments
    /// * `functions` - registries resolving the function names stored on the gene
    /// * `inputs` - values arriving at the gene
    ///
    /// # Returns
    /// The output and the context to pass to [`Differentiable::backward`].
    fn forward(
        &self,
        functions: &FunctionRegistries,
        inputs: &[f64],
    ) -> Result<(f64, Self::Context), EvaluationError>;

    /// Applies the chain rule to the gradient arriving at the output.
    ///
    /// # Arguments
    /// * `context` - context returned by the forward pass being differentiated
    /// * `output_gradient` - derivative of the loss w.r.t. the output of that forward pass
    fn backward(&self, context: &Self::Context, output_gradient: f64) -> Self::Gradient;
}


/// Intermediate values of a node's forward pass.
#[derive(Clone, Debug)]
pub struct NodeContext {
    pub inputs: Vec<f64>,
    /// Result of the aggregation function.
    pub aggregated: f64,
    /// Argument of the activation function.
    pub pre_activation: f64,
    pub output: f64,
    activation: ActivationFunction,
    aggregation: AggregationFunction,
}


#[derive(Clone, Debug, PartialEq)]
pub struct NodeGradient {
    pub inputs: Vec<f64>,
    pub response: f64,
    pub bias: f64,
}


impl Differentiable for DefaultNodeGene {
    type Context = NodeContext;
    type Gradient = NodeGradient;

    /// `activation(response * aggregation(inputs) + bias)`
    fn forward(&self, functions: &FunctionRegistries, inputs: &[f64]) -> Result<(f64, NodeContext), EvaluationError> {
        let activation = self.activation_function(functions)
            .ok_or_else(|| EvaluationError::UnknownActivation(self.activation.clone()))?
            .clone();
        let aggregation = self.aggregation_function(functions)
            .ok_or_else(|| EvaluationError::UnknownAggregation(self.aggregation.clone()))?
            .clone();
        let aggregated = aggregation.calc(inputs);
        let pre_activation = self.response * aggregated + self.bias;
        let output = activation.calc(pre_activation);
        let context = NodeContext {
            inputs: inputs.to_vec(),
            aggregated,
            pre_activation,
            output,
            activation,
            aggregation,
        };
        return Ok((output, context));
    }

    fn backward(&self, context: &NodeContext, output_gradient: f64) -> NodeGradient {
        let delta = output_gradient * context.activation.derivative(context.pre_activation);
        let inputs = context.aggregation
            .derivative(&context.inputs)
            .into_iter()
            .map(|partial| delta * self.response * partial)
            .collect();
        trace!("node {}: backward delta {delta}", self.key());
        NodeGradient { inputs, response: delta * context.aggregated, bias: delta }
    }
}


/// Intermediate values of a connection's forward pass.
#[derive(Clone, Debug)]
pub struct ConnectionContext {
    pub input: f64,
    pub output: f64,
}


#[derive(Clone, Debug, PartialEq)]
pub struct ConnectionGradient {
    pub input: f64,
    pub weight: f64,
}


impl Differentiable for DefaultConnectionGene {
    type Context = ConnectionContext;
    type Gradient = ConnectionGradient;

    /// `weight * inputs[0]`; exactly one input is accepted.
    fn forward(&self, _functions: &FunctionRegistries, inputs: &[f64]) -> Result<(f64, ConnectionContext), EvaluationError> {
        let [input] = inputs else {
            return Err(EvaluationError::Arity { expected: 1, actual: inputs.len() });
        };
        let output = self.weight * input;
        Ok((output, ConnectionContext { input: *input, output }))
    }

    fn backward(&self, context: &ConnectionContext, output_gradient: f64) -> ConnectionGradient {
        ConnectionGradient {
            input: output_gradient * self.weight,
            weight: output_gradient * context.input,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::sigmoid;

    const EPSILON: f64 = 1e-6;

    fn assert_close(actual: f64, expected: f64) {
        assert!((actual - expected).abs() < 1e-5, "{actual} != {expected}");
    }

    fn node_output(node: &DefaultNodeGene, inputs: &[f64]) -> f64 {
        node.forward(&FunctionRegistries::default(), inputs).unwrap().0
    }

    #[test]
    fn test_node_forward() {
        let node = DefaultNodeGene::new(0, 2., 0.5, "sigmoid", "sum");
        let (output, context) = node.forward(&FunctionRegistries::default(), &[1., -0.25]).unwrap();
        assert_eq!(context.aggregated, 0.75);
        assert_eq!(context.pre_activation, 2.);
        assert_eq!(output, sigmoid(2.));
        assert_eq!(context.output, output);
    }

    #[test]
    fn test_node_forward_unknown_function() {
        let functions = FunctionRegistries::default();
        let node = DefaultNodeGene::new(0, 1., 0., "softsign", "sum");
        assert_eq!(
            node.forward(&functions, &[1.]).unwrap_err(),
            EvaluationError::UnknownActivation("softsign".to_owned()),
        );
        let node = DefaultNodeGene::new(0, 1., 0., "tanh", "median");
        assert_eq!(
            node.forward(&functions, &[1.]).unwrap_err(),
            EvaluationError::UnknownAggregation("median".to_owned()),
        );
    }

    #[test]
    fn test_node_backward_matches_finite_differences() {
        let inputs = [0.3, -1.2, 0.8];
        for (activation, aggregation) in [("sigmoid", "sum"), ("tanh", "product"), ("gaussian", "mean")] {
            let node = DefaultNodeGene::new(0, 0.7, -0.1, activation, aggregation);
            let (_, context) = node.forward(&FunctionRegistries::default(), &inputs).unwrap();
            let gradient = node.backward(&context, 1.);

            let mut shifted = node.clone();
            shifted.bias += EPSILON;
            assert_close(gradient.bias, (node_output(&shifted, &inputs) - context.output) / EPSILON);

            let mut shifted = node.clone();
            shifted.response += EPSILON;
            assert_close(gradient.response, (node_output(&shifted, &inputs) - context.output) / EPSILON);

            for idx in 0..inputs.len() {
                let mut shifted_inputs = inputs;
                shifted_inputs[idx] += EPSILON;
                let numeric = (node_output(&node, &shifted_inputs) - context.output) / EPSILON;
                assert_close(gradient.inputs[idx], numeric);
            }
        }
    }

    #[test]
    fn test_node_backward_scales_with_output_gradient() {
        let node = DefaultNodeGene::new(0, 1.5, 0.2, "tanh", "sum");
        let (_, context) = node.forward(&FunctionRegistries::default(), &[0.4, 0.1]).unwrap();
        let unit = node.backward(&context, 1.);
        let scaled = node.backward(&context, -3.);
        assert_close(scaled.bias, -3. * unit.bias);
        assert_close(scaled.response, -3. * unit.response);
    }

    #[test]
    fn test_interleaved_evaluations() {
        let node = DefaultNodeGene::new(0, 1., 0., "identity", "sum");
        let functions = FunctionRegistries::default();
        let (_, first) = node.forward(&functions, &[1., 2.]).unwrap();
        let (_, second) = node.forward(&functions, &[5.]).unwrap();
        assert_eq!(node.backward(&first, 1.).inputs, vec![1., 1.]);
        assert_eq!(node.backward(&second, 2.).inputs, vec![2.]);
        assert_eq!(node.backward(&first, 1.).response, 3.);
    }

    #[test]
    fn test_connection_forward_backward() {
        let connection = DefaultConnectionGene::new((-1, 0), -0.5, true);
        let functions = FunctionRegistries::default();
        let (output, context) = connection.forward(&functions, &[4.]).unwrap();
        assert_eq!(output, -2.);
        let gradient = connection.backward(&context, 2.);
        assert_eq!(gradient, ConnectionGradient { input: -1., weight: 8. });
    }

    #[test]
    fn test_connection_arity() {
        let connection = DefaultConnectionGene::new((-1, 0), 1., true);
        let functions = FunctionRegistries::default();
        assert_eq!(
            connection.forward(&functions, &[1., 2.]).unwrap_err(),
            EvaluationError::Arity { expected: 1, actual: 2 },
        );
        assert_eq!(
            connection.forward(&functions, &[]).unwrap_err(),
            EvaluationError::Arity { expected: 1, actual: 0 },
        );
    }
}
