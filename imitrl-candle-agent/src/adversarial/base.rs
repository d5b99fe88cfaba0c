//! Adversarial imitation learning update step.
use super::AdversarialConfig;
use crate::{
    dataset::{TransitionBatch, TransitionDataset},
    discriminator::{Discriminator, DiscriminatorInput},
    policy::StochasticPolicy,
    util::{binary_cross_entropy, mean_scalar},
};
use anyhow::Result;
use candle_core::Tensor;
use imitrl_core::{
    error::ImitrlError,
    record::{Record, RecordStorage, RecordValue},
    AdversarialAlgorithm, MiniBatchSampler, TransitionIndexer,
};
use log::{debug, trace};

/// Trains a discriminator of expert against policy transitions.
pub struct AdversarialImitation {
    config: AdversarialConfig,
    sampler: MiniBatchSampler,
}

impl AdversarialImitation {
    /// Creates the update step with the given configuration.
    pub fn new(config: AdversarialConfig) -> Result<Self> {
        if config.batch_size == 0 {
            return Err(ImitrlError::InvalidBatchSize(0).into());
        }
        let sampler = MiniBatchSampler::new(config.seed);
        Ok(Self { config, sampler })
    }

    /// Returns the algorithm.
    pub fn algorithm(&self) -> AdversarialAlgorithm {
        self.config.algorithm
    }

    /// Likelihoods `π(a|s)` of the current policy, cut off from the graph.
    fn likelihood<P: StochasticPolicy>(policy: &P, batch: &TransitionBatch) -> Result<Tensor> {
        Ok(policy.logp(&batch.obs, &batch.act)?.detach().exp()?)
    }

    /// Discriminator outputs on a pair of expert and policy mini-batches.
    fn scores<P, D>(
        &self,
        policy: &P,
        discriminator: &D,
        expert: &TransitionBatch,
        agent: &TransitionBatch,
    ) -> Result<(Tensor, Tensor)>
    where
        P: StochasticPolicy,
        D: Discriminator,
    {
        match self.config.algorithm {
            AdversarialAlgorithm::Gail => {
                let d_expert = discriminator.forward(&DiscriminatorInput::Gail {
                    obs: &expert.obs,
                    act: &expert.act,
                })?;
                let d_policy = discriminator.forward(&DiscriminatorInput::Gail {
                    obs: &agent.obs,
                    act: &agent.act,
                })?;
                Ok((d_expert, d_policy))
            }
            AdversarialAlgorithm::Airl => {
                let pi_expert = Self::likelihood(policy, expert)?;
                let pi_policy = Self::likelihood(policy, agent)?;
                let d_expert = discriminator.forward(&DiscriminatorInput::Airl {
                    obs: &expert.obs,
                    act: &expert.act,
                    next_obs: &expert.next_obs,
                    policy_prob: &pi_expert,
                })?;
                let d_policy = discriminator.forward(&DiscriminatorInput::Airl {
                    obs: &agent.obs,
                    act: &agent.act,
                    next_obs: &agent.next_obs,
                    policy_prob: &pi_policy,
                })?;
                Ok((d_expert, d_policy))
            }
        }
    }

    /// Runs one pass over paired shuffled mini-batches of expert and policy
    /// transitions.
    ///
    /// The number of pairs is limited by the shorter dataset and incomplete
    /// mini-batches are dropped. Each pair is one optimization step of the
    /// discriminator on `BCE(D_expert, 1) + BCE(D_policy, 0)`.
    pub fn update<P, D>(
        &mut self,
        policy: &P,
        discriminator: &mut D,
        expert: &TransitionDataset,
        agent: &TransitionDataset,
    ) -> Result<Record>
    where
        P: StochasticPolicy,
        D: Discriminator,
    {
        let pairs = self
            .sampler
            .paired_batches(expert.len(), agent.len(), self.config.batch_size)?;
        let n_minibatches = pairs.len();
        let mut storage = RecordStorage::new();

        for (ixs_expert, ixs_policy) in pairs.iter() {
            let expert_batch = expert.sample(ixs_expert)?;
            let policy_batch = agent.sample(ixs_policy)?;
            let (d_expert, d_policy) = self.scores(policy, discriminator, &expert_batch, &policy_batch)?;
            trace!("d_expert: {:?}, d_policy: {:?}", d_expert.dims(), d_policy.dims());

            let loss = (binary_cross_entropy(&d_expert, 1.0)? + binary_cross_entropy(&d_policy, 0.0)?)?;
            discriminator.backward_step(&loss)?;

            storage.store(Record::from_slice(&[
                ("loss_discriminator", RecordValue::Scalar(mean_scalar(&loss)?)),
                ("d_expert_mean", RecordValue::Scalar(mean_scalar(&d_expert)?)),
                ("d_policy_mean", RecordValue::Scalar(mean_scalar(&d_policy)?)),
            ]));
        }

        let mut record = storage.aggregate();
        record.insert("n_minibatches", RecordValue::Scalar(n_minibatches as f32));
        record.insert(
            "algorithm",
            RecordValue::String(self.config.algorithm.to_string()),
        );
        debug!(
            "{}: {} mini-batches, loss_discriminator = {:?}",
            self.config.algorithm,
            n_minibatches,
            record.get_scalar("loss_discriminator")
        );

        Ok(record)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        discriminator::{GailDiscriminator, GailDiscriminatorConfig},
        model::SubModel2,
        opt::OptimizerConfig,
    };
    use candle_core::{Device, D};
    use candle_nn::{Init, Linear, Module, VarBuilder};
    use std::cell::RefCell;

    /// Policy with constant log-probability.
    struct ConstPolicy(f32);

    impl StochasticPolicy for ConstPolicy {
        fn logp(&self, obs: &Tensor, _act: &Tensor) -> Result<Tensor> {
            Ok(Tensor::full(self.0, obs.dim(0)?, obs.device())?)
        }

        fn backward_step(&mut self, _loss: &Tensor, _max_grad_norm: Option<f64>) -> Result<f32> {
            Ok(0.0)
        }
    }

    /// Policy with `logp(s, a) = 0.1 * (sum(s) + sum(a))`.
    struct LinearLogpPolicy;

    impl StochasticPolicy for LinearLogpPolicy {
        fn logp(&self, obs: &Tensor, act: &Tensor) -> Result<Tensor> {
            let s = obs.sum(D::Minus1)?;
            let a = act.sum(D::Minus1)?;
            Ok(((s + a)? * 0.1)?)
        }

        fn backward_step(&mut self, _loss: &Tensor, _max_grad_norm: Option<f64>) -> Result<f32> {
            Ok(0.0)
        }
    }

    /// Discriminator recording the actions and likelihoods it is called with.
    #[derive(Default)]
    struct RecordingDiscriminator {
        acts: RefCell<Vec<Vec<f32>>>,
        probs: RefCell<Vec<Vec<f32>>>,
        n_steps: usize,
    }

    impl Discriminator for RecordingDiscriminator {
        fn forward(&self, input: &DiscriminatorInput) -> Result<Tensor> {
            let (obs, act) = match input {
                DiscriminatorInput::Gail { obs, act } => (obs, act),
                DiscriminatorInput::Airl {
                    obs,
                    act,
                    policy_prob,
                    ..
                } => {
                    self.probs.borrow_mut().push(policy_prob.to_vec1()?);
                    (obs, act)
                }
            };
            self.acts.borrow_mut().push(act.flatten_all()?.to_vec1()?);
            Ok(Tensor::full(0.5f32, obs.dim(0)?, obs.device())?)
        }

        fn predict_reward(&self, input: &DiscriminatorInput) -> Result<Tensor> {
            self.forward(input)
        }

        fn backward_step(&mut self, _loss: &Tensor) -> Result<()> {
            self.n_steps += 1;
            Ok(())
        }
    }

    /// Linear logit initialized to zero, so that `D = 0.5` everywhere.
    struct ZeroLinear(Linear);

    impl SubModel2 for ZeroLinear {
        type Config = usize;
        type Input1 = Tensor;
        type Input2 = Tensor;
        type Output = Tensor;

        fn build(vb: VarBuilder, in_dim: usize) -> Result<Self> {
            let w = vb.get_with_hints((1, in_dim), "weight", Init::Const(0.))?;
            let b = vb.get_with_hints(1, "bias", Init::Const(0.))?;
            Ok(Self(Linear::new(w, Some(b))))
        }

        fn forward(&self, obs: &Tensor, act: &Tensor) -> Result<Tensor> {
            let xs = Tensor::cat(&[obs, act], D::Minus1)?;
            Ok(self.0.forward(&xs)?)
        }
    }

    /// `n` timesteps with all features and actions equal to `v`.
    fn constant_dataset(n: usize, v: f32) -> Result<TransitionDataset> {
        let obs = Tensor::full(v, (n, 2), &Device::Cpu)?;
        let act = Tensor::full(v, (n, 1), &Device::Cpu)?;
        TransitionDataset::new(obs, act, vec![0.0; n], vec![0; n])
    }

    #[test]
    fn test_pairs_limited_by_shorter_dataset() -> Result<()> {
        // 10 expert and 7 policy transitions in mini-batches of 3
        let expert = constant_dataset(11, 1.0)?;
        let agent = constant_dataset(8, -1.0)?;
        let mut disc = RecordingDiscriminator::default();
        let config = AdversarialConfig::default().batch_size(3);
        let mut step = AdversarialImitation::new(config)?;

        let record = step.update(&ConstPolicy(0.0), &mut disc, &expert, &agent)?;
        assert_eq!(record.get_scalar("n_minibatches")?, 2.0);
        assert_eq!(record.get_string("algorithm")?, "GAIL");
        assert_eq!(disc.n_steps, 2);
        assert!((record.get_scalar("loss_discriminator")? - 2.0 * 2f32.ln()).abs() < 1e-5);
        Ok(())
    }

    #[test]
    fn test_airl_scores_policy_with_its_own_action() -> Result<()> {
        let expert = constant_dataset(5, 1.0)?;
        let agent = constant_dataset(5, -1.0)?;
        let mut disc = RecordingDiscriminator::default();
        let config = AdversarialConfig::default()
            .algorithm(AdversarialAlgorithm::Airl)
            .batch_size(4);
        let mut step = AdversarialImitation::new(config)?;

        step.update(&LinearLogpPolicy, &mut disc, &expert, &agent)?;

        let acts = disc.acts.borrow();
        assert_eq!(acts.len(), 2);
        assert_eq!(acts[0], vec![1.0; 4]);
        assert_eq!(acts[1], vec![-1.0; 4]);

        // Expert side: logp(s_e, a_e) = 0.1 * (2 + 1)
        // Policy side: logp(s_p, a_p) = 0.1 * (-2 - 1)
        let probs = disc.probs.borrow();
        assert_eq!(probs.len(), 2);
        for (p, logp) in probs.iter().zip([0.3f32, -0.3].iter()) {
            assert_eq!(p.len(), 4);
            for x in p.iter() {
                assert!((x - logp.exp()).abs() < 1e-5);
            }
        }
        Ok(())
    }

    #[test]
    fn test_gail_separates_expert_from_policy() -> Result<()> {
        let expert = constant_dataset(9, 1.0)?;
        let agent = constant_dataset(9, -1.0)?;
        let config = GailDiscriminatorConfig::default()
            .model_config(3)
            .opt_config(OptimizerConfig::Adam { lr: 1e-2 });
        let mut disc = GailDiscriminator::<ZeroLinear>::build(config, Device::Cpu)?;
        let mut step = AdversarialImitation::new(AdversarialConfig::default().batch_size(4))?;

        let score = |disc: &GailDiscriminator<ZeroLinear>, data: &TransitionDataset| -> Result<f32> {
            let batch = data.sample(&[0, 1, 2, 3])?;
            mean_scalar(&disc.forward(&DiscriminatorInput::Gail {
                obs: &batch.obs,
                act: &batch.act,
            })?)
        };
        assert!((score(&disc, &expert)? - 0.5).abs() < 1e-6);
        assert!((score(&disc, &agent)? - 0.5).abs() < 1e-6);

        step.update(&ConstPolicy(0.0), &mut disc, &expert, &agent)?;
        assert!(score(&disc, &expert)? > 0.5);
        assert!(score(&disc, &agent)? < 0.5);
        Ok(())
    }
}
